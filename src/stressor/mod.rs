//! Стрессор: настройка размера и метода, кооперативная остановка, цикл нагрузки

pub mod config;
pub mod control;
pub mod runner;

pub use config::{
    MatrixConfig, SizeLimits, SizePolicy, DEFAULT_MATRIX_SIZE, MAX_MATRIX_SIZE, MIN_MATRIX_SIZE,
};
pub use control::{BlackBoxSink, RecordingSink, RunControl, Sink, StopFlag};
pub use runner::{ExitStatus, MatrixStressor, RunBudget};
