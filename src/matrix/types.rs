//! Типы матриц и связанные структуры

use rand::RngCore;

/// Тип элемента матриц
pub type Element = f32;

/// Нормирующий множитель: `next_u32() * NORMALIZE` попадает в `[0, 1]`
pub const NORMALIZE: Element = 1.0 / (u32::MAX as Element);

/// Квадратная матрица `n x n`, хранится построчно в одном буфере на куче
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<Element>,
}

impl Matrix {
    /// Матрица, заполненная нулями
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Матрица из готового буфера длины `n * n`
    pub fn from_vec(n: usize, data: Vec<Element>) -> Option<Self> {
        if data.len() != n * n {
            return None;
        }
        Some(Self { n, data })
    }

    /// Буфер уже имеет длину `n * n`
    pub(crate) fn from_parts(n: usize, data: Vec<Element>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self { n, data }
    }

    /// Матрица, заполненная псевдослучайными значениями из `rng`
    pub fn random<R: RngCore + ?Sized>(n: usize, rng: &mut R) -> Self {
        let data = (0..n * n)
            .map(|_| rng.next_u32() as Element * NORMALIZE)
            .collect();
        Self { n, data }
    }

    /// Размерность
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Element {
        self.data[row * self.n + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Element) {
        self.data[row * self.n + col] = value;
    }

    /// Строка `row` как срез
    #[inline]
    pub fn row(&self, row: usize) -> &[Element] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [Element] {
        let n = self.n;
        &mut self.data[row * n..(row + 1) * n]
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }
}

/// Операнды одного прогона: A, B и матрица результата R
#[derive(Debug, Clone)]
pub struct Operands {
    pub a: Matrix,
    pub b: Matrix,
    pub r: Matrix,
}

impl Operands {
    /// Собирает операнды из готовых матриц одинаковой размерности
    pub fn new(a: Matrix, b: Matrix, r: Matrix) -> Option<Self> {
        if a.n() != b.n() || a.n() != r.n() {
            return None;
        }
        Some(Self { a, b, r })
    }
}
