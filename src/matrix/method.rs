//! Реестр методов нагрузки и круговой диспетчер режима "all"

use super::operations;
use super::types::Operands;
use crate::error::ConfigError;
use crate::stressor::control::{RunControl, Sink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Объявляет перечисление методов и упорядоченный реестр к нему
macro_rules! matrix_methods {
    ($($(#[$attr:meta])* $variant:ident => $name:literal),+ $(,)?) => {
        /// Метод нагрузки на матрицах
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum MatrixMethod {
            $($(#[$attr])* $variant),+
        }

        /// Реестр в порядке перебора; первым всегда идет "all"
        pub const METHODS: &[MatrixMethod] = &[$(MatrixMethod::$variant),+];

        impl MatrixMethod {
            /// Имя метода в реестре
            pub const fn name(self) -> &'static str {
                match self {
                    $(MatrixMethod::$variant => $name),+
                }
            }
        }
    };
}

matrix_methods! {
    #[default]
    All => "all",
    Add => "add",
    Div => "div",
    Frobenius => "frobenius",
    Hadamard => "hadamard",
    Mult => "mult",
    Prod => "prod",
    Sub => "sub",
    Trans => "trans",
}

impl MatrixMethod {
    /// Поиск по точному (с учетом регистра) имени
    pub fn from_name(name: &str) -> Option<Self> {
        METHODS.iter().copied().find(|m| m.name() == name)
    }

    /// Имена всех методов в порядке реестра
    pub fn names() -> impl Iterator<Item = &'static str> {
        METHODS.iter().map(|m| m.name())
    }

    /// Методы, которые выполняют реальную работу (все, кроме "all")
    pub fn concrete() -> &'static [MatrixMethod] {
        &METHODS[1..]
    }

    /// Выполняет один вызов метода над операндами.
    ///
    /// Возвращает метод, который фактически отработал: для "all" это
    /// очередной метод из реестра, для остальных сам метод.
    pub fn apply(self, ops: &mut Operands, ctx: &mut ExecContext<'_>) -> MatrixMethod {
        let control = ctx.control;
        match self {
            MatrixMethod::All => return ctx.round_robin.advance().apply(ops, ctx),
            MatrixMethod::Add => operations::add(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Div => operations::div(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Frobenius => {
                if let Some(sum) = operations::frobenius(&ops.a, &ops.b, control) {
                    ctx.sink.put_f32(sum);
                }
            }
            MatrixMethod::Hadamard => operations::hadamard(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Mult => operations::mult(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Prod => operations::prod(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Sub => operations::sub(&ops.a, &ops.b, &mut ops.r, control),
            MatrixMethod::Trans => operations::trans(&ops.a, &mut ops.r, control),
        }
        self
    }
}

impl fmt::Display for MatrixMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

/// Курсор режима "all": индекс в реестре, пропускающий сам "all"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobin {
    cursor: usize,
}

impl RoundRobin {
    pub const fn new() -> Self {
        Self { cursor: 1 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Отдает метод под курсором и сдвигает курсор, с переходом на 1 после конца
    pub fn advance(&mut self) -> MatrixMethod {
        let method = METHODS[self.cursor];
        self.cursor += 1;
        if self.cursor >= METHODS.len() {
            self.cursor = 1;
        }
        method
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

/// Состояние одного прогона, которое нужно операциям
pub struct ExecContext<'a> {
    control: &'a dyn RunControl,
    sink: &'a mut dyn Sink,
    round_robin: RoundRobin,
}

impl<'a> ExecContext<'a> {
    /// Новый контекст со свежим курсором "all"
    pub fn new(control: &'a dyn RunControl, sink: &'a mut dyn Sink) -> Self {
        Self {
            control,
            sink,
            round_robin: RoundRobin::new(),
        }
    }

    pub fn round_robin(&self) -> &RoundRobin {
        &self.round_robin
    }

    pub fn keep_running(&self) -> bool {
        self.control.keep_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::types::Matrix;
    use crate::stressor::control::RecordingSink;

    fn operands(n: usize) -> Operands {
        Operands::new(Matrix::zeros(n), Matrix::zeros(n), Matrix::zeros(n)).unwrap()
    }

    #[test]
    fn registry_order_and_names() {
        let names: Vec<_> = MatrixMethod::names().collect();
        assert_eq!(
            names,
            ["all", "add", "div", "frobenius", "hadamard", "mult", "prod", "sub", "trans"]
        );
        assert_eq!(METHODS[0], MatrixMethod::All);
        assert_eq!(MatrixMethod::default(), MatrixMethod::All);
        assert_eq!(MatrixMethod::concrete().len(), 8);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        assert_eq!(MatrixMethod::from_name("prod"), Some(MatrixMethod::Prod));
        assert_eq!(MatrixMethod::from_name("Prod"), None);
        assert_eq!(MatrixMethod::from_name("pro"), None);
        assert!(matches!(
            "bogus".parse::<MatrixMethod>(),
            Err(ConfigError::UnknownMethod(name)) if name == "bogus"
        ));
    }

    #[test]
    fn serde_uses_registry_names() {
        let json = serde_json::to_string(&MatrixMethod::Frobenius).unwrap();
        assert_eq!(json, "\"frobenius\"");
        let back: MatrixMethod = serde_json::from_str("\"trans\"").unwrap();
        assert_eq!(back, MatrixMethod::Trans);
    }

    #[test]
    fn round_robin_wraps_to_first_concrete_method() {
        let mut rr = RoundRobin::new();
        let first: Vec<_> = (0..8).map(|_| rr.advance()).collect();
        assert_eq!(first, MatrixMethod::concrete());
        assert_eq!(rr.cursor(), 1);
        assert_eq!(rr.advance(), MatrixMethod::Add);
    }

    #[test]
    fn all_delegates_in_registry_order() {
        let control = || true;
        let mut sink = RecordingSink::default();
        let mut ops = operands(4);
        let mut ctx = ExecContext::new(&control, &mut sink);

        let ran: Vec<_> = (0..8).map(|_| MatrixMethod::All.apply(&mut ops, &mut ctx)).collect();
        assert_eq!(ran, MatrixMethod::concrete());
        assert_eq!(ctx.round_robin().cursor(), 1);
        drop(ctx);
        assert_eq!(sink.count, 1);
    }

    #[test]
    fn concrete_methods_do_not_touch_the_cursor() {
        let control = || true;
        let mut sink = RecordingSink::default();
        let mut ops = operands(2);
        let mut ctx = ExecContext::new(&control, &mut sink);
        assert_eq!(MatrixMethod::Sub.apply(&mut ops, &mut ctx), MatrixMethod::Sub);
        assert_eq!(ctx.round_robin().cursor(), 1);
    }
}
