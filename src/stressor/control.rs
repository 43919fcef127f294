//! Кооперативная остановка и "сток" для результатов вычислений

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Проверка "продолжать ли работу", опрашивается внутри операций
pub trait RunControl {
    fn keep_running(&self) -> bool;
}

impl<F> RunControl for F
where
    F: Fn() -> bool,
{
    fn keep_running(&self) -> bool {
        self()
    }
}

/// Общий флаг работы: клоны смотрят на одно и то же значение
#[derive(Debug, Clone)]
pub struct StopFlag {
    running: Arc<AtomicBool>,
}

impl StopFlag {
    /// Новый флаг в состоянии "работаем"
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Просит все прогоны, разделяющие флаг, остановиться
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl for StopFlag {
    fn keep_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Потребитель скалярных результатов, которые иначе никуда не сохраняются
pub trait Sink {
    fn put_f32(&mut self, value: f32);
}

/// Сток через `black_box`: не дает компилятору выбросить вычисление
#[derive(Debug, Default, Clone, Copy)]
pub struct BlackBoxSink;

impl Sink for BlackBoxSink {
    #[inline]
    fn put_f32(&mut self, value: f32) {
        std::hint::black_box(value);
    }
}

/// Сток, запоминающий последнее значение и число поступлений
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordingSink {
    pub last: Option<f32>,
    pub count: u64,
}

impl Sink for RecordingSink {
    fn put_f32(&mut self, value: f32) {
        self.last = Some(std::hint::black_box(value));
        self.count += 1;
    }
}
