//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Квадратные матрицы и операнды прогона
//! - Восемь операций нагрузки
//! - Реестр методов и диспетчер режима "all"

mod types;
pub mod operations;
pub mod method;

pub use types::{Element, Matrix, Operands, NORMALIZE};
pub use operations::{compare_results, initialize_operands};
pub use method::{ExecContext, MatrixMethod, RoundRobin, METHODS};
