//! Основной цикл нагрузки

use super::config::MatrixConfig;
use super::control::{RunControl, Sink};
use crate::matrix::{initialize_operands, ExecContext};
use log::{debug, info};
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// Код завершения прогона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Бюджет прогона, которым владеет обвязка
pub struct RunBudget<'a> {
    /// Сигнал "продолжать работу"
    pub control: &'a dyn RunControl,
    /// Число завершенных вызовов операции
    pub counter: &'a AtomicU64,
    /// Ограничение на число операций, 0 без ограничения
    pub max_ops: u64,
}

impl RunBudget<'_> {
    fn exhausted(&self, done: u64) -> bool {
        self.max_ops != 0 && done >= self.max_ops
    }
}

/// Стрессор на матричных операциях
#[derive(Debug, Clone, Default)]
pub struct MatrixStressor {
    config: MatrixConfig,
}

impl MatrixStressor {
    pub fn new(config: MatrixConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Выделяет матрицы и крутит выбранный метод, пока не попросят остановиться
    /// или пока не исчерпан `max_ops`.
    ///
    /// Хотя бы один вызов выполняется всегда. Матрицы живут только внутри вызова.
    pub fn run<R: RngCore + ?Sized>(
        &self,
        budget: &RunBudget<'_>,
        instance: u32,
        name: &str,
        rng: &mut R,
        sink: &mut dyn Sink,
    ) -> ExitStatus {
        let method = self.config.method();
        let n = self.config.effective_size();
        debug!(
            "{name}: экземпляр {instance}, метод {method}, матрицы {n}x{n}, max_ops {}",
            budget.max_ops
        );

        let mut operands = initialize_operands(n, rng);
        let mut ctx = ExecContext::new(budget.control, sink);

        loop {
            method.apply(&mut operands, &mut ctx);
            let done = budget.counter.fetch_add(1, Ordering::Relaxed) + 1;
            if !ctx.keep_running() || budget.exhausted(done) {
                break;
            }
        }

        info!(
            "{name}: экземпляр {instance} завершен, операций {}",
            budget.counter.load(Ordering::Relaxed)
        );
        ExitStatus::Success
    }
}
