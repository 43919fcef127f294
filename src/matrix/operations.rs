//! Операции над матрицами
//!
//! Все операции работают "на месте" над R и прерываются, как только
//! `control.keep_running()` вернет `false`: поэлементные операции проверяют
//! флаг после каждой строки, `prod` после каждой пары (i, j).

use super::types::{Element, Matrix, Operands, NORMALIZE};
use crate::stressor::control::RunControl;
use rand::RngCore;

/// Выделяет и инициализирует операнды: A и B случайные, R нулевая
///
/// Значения для A и B берутся из `rng` поочередно, элемент за элементом.
pub fn initialize_operands<R: RngCore + ?Sized>(n: usize, rng: &mut R) -> Operands {
    let mut a = Vec::with_capacity(n * n);
    let mut b = Vec::with_capacity(n * n);
    for _ in 0..n * n {
        a.push(rng.next_u32() as Element * NORMALIZE);
        b.push(rng.next_u32() as Element * NORMALIZE);
    }
    Operands {
        a: Matrix::from_parts(n, a),
        b: Matrix::from_parts(n, b),
        r: Matrix::zeros(n),
    }
}

/// Поэлементная операция над строками A и B
#[inline]
fn elementwise<F>(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl, f: F)
where
    F: Fn(Element, Element) -> Element,
{
    for i in 0..a.n() {
        let (ra, rb) = (a.row(i), b.row(i));
        for ((out, &x), &y) in r.row_mut(i).iter_mut().zip(ra).zip(rb) {
            *out = f(x, y);
        }
        if !control.keep_running() {
            return;
        }
    }
}

/// Сложение: R = A + B
pub fn add(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    elementwise(a, b, r, control, |x, y| x + y);
}

/// Вычитание: R = A - B
pub fn sub(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    elementwise(a, b, r, control, |x, y| x - y);
}

/// Произведение Адамара: (A o B)ij = Aij * Bij
pub fn hadamard(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    elementwise(a, b, r, control, |x, y| x * y);
}

/// Произведение Фробениуса: A : B = Sum(Aij * Bij)
///
/// Возвращает `None`, если вычисление было прервано.
pub fn frobenius(a: &Matrix, b: &Matrix, control: &dyn RunControl) -> Option<Element> {
    let mut sum: Element = 0.0;
    for i in 0..a.n() {
        sum += a.row(i).iter().zip(b.row(i)).map(|(&x, &y)| x * y).sum::<Element>();
        if !control.keep_running() {
            return None;
        }
    }
    Some(sum)
}

/// Транспонирование: R = A^T, B не используется
pub fn trans(a: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    let n = a.n();
    for i in 0..n {
        for j in 0..n {
            r.set(i, j, a.get(j, i));
        }
        if !control.keep_running() {
            return;
        }
    }
}

/// Умножение на скаляр: R = B[0][0] * A
///
/// B поставляет скаляр своим первым элементом, это не матричное умножение.
pub fn mult(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    let v = b.get(0, 0);
    for i in 0..a.n() {
        for (out, &x) in r.row_mut(i).iter_mut().zip(a.row(i)) {
            *out = v * x;
        }
        if !control.keep_running() {
            return;
        }
    }
}

/// Деление на скаляр: R = A / B[0][0]
///
/// Деление на нулевой B[0][0] не проверяется: получаются inf/NaN.
pub fn div(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    let v = b.get(0, 0);
    for i in 0..a.n() {
        for (out, &x) in r.row_mut(i).iter_mut().zip(a.row(i)) {
            *out = x / v;
        }
        if !control.keep_running() {
            return;
        }
    }
}

/// Матричное произведение: R += A * B
///
/// Накапливает в R, поэтому для честного результата R должна быть нулевой.
pub fn prod(a: &Matrix, b: &Matrix, r: &mut Matrix, control: &dyn RunControl) {
    let n = a.n();
    for i in 0..n {
        for j in 0..n {
            let mut acc = r.get(i, j);
            for k in 0..n {
                acc += a.get(i, k) * b.get(k, j);
            }
            r.set(i, j, acc);
            if !control.keep_running() {
                return;
            }
        }
    }
}

/// Сравнивает две матрицы поэлементно с допуском `epsilon`
pub fn compare_results(x: &Matrix, y: &Matrix, epsilon: Element) -> bool {
    x.n() == y.n()
        && x
            .as_slice()
            .iter()
            .zip(y.as_slice())
            .all(|(&p, &q)| (p - q).abs() <= epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn always() -> impl Fn() -> bool {
        || true
    }

    fn m(n: usize, data: &[Element]) -> Matrix {
        Matrix::from_vec(n, data.to_vec()).unwrap()
    }

    #[test]
    fn elementwise_operations() {
        let a = m(2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, &[5.0, 6.0, 7.0, 8.0]);
        let mut r = Matrix::zeros(2);

        add(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[6.0, 8.0, 10.0, 12.0]);
        sub(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[-4.0, -4.0, -4.0, -4.0]);
        hadamard(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[5.0, 12.0, 21.0, 32.0]);
    }

    #[test]
    fn frobenius_is_sum_of_products() {
        let a = m(2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(frobenius(&a, &b, &always()), Some(70.0));
    }

    #[test]
    fn trans_mult_div() {
        let a = m(2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, &[2.0, 9.0, 9.0, 9.0]);
        let mut r = Matrix::zeros(2);

        trans(&a, &mut r, &always());
        assert_eq!(r.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
        mult(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
        div(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn div_by_zero_scalar_is_not_guarded() {
        let a = m(2, &[1.0, 0.0, 1.0, 1.0]);
        let b = Matrix::zeros(2);
        let mut r = Matrix::zeros(2);
        div(&a, &b, &mut r, &always());
        assert!(r.get(0, 0).is_infinite());
        assert!(r.get(0, 1).is_nan());
    }

    #[test]
    fn prod_accumulates_into_r() {
        let a = m(2, &[1.0, 2.0, 3.0, 4.0]);
        let b = m(2, &[5.0, 6.0, 7.0, 8.0]);
        let mut r = Matrix::zeros(2);
        prod(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
        prod(&a, &b, &mut r, &always());
        assert_eq!(r.as_slice(), &[38.0, 44.0, 86.0, 100.0]);
    }

    type RowOp = fn(&Matrix, &Matrix, &mut Matrix, &dyn RunControl);

    fn assert_stops_after_first_row(name: &str, op: RowOp) {
        let n = 8;
        let a = m(n, &vec![3.0; n * n]);
        let b = m(n, &vec![2.0; n * n]);
        let mut r = Matrix::zeros(n);
        let polls = Cell::new(0);
        let stop = || {
            polls.set(polls.get() + 1);
            false
        };
        op(&a, &b, &mut r, &stop);
        assert_eq!(polls.get(), 1, "{name}: лишние опросы");
        assert!(r.row(0).iter().all(|&v| v != 0.0), "{name}: первая строка не посчитана");
        assert!(r.as_slice()[n..].iter().all(|&v| v == 0.0), "{name}: работа после остановки");
    }

    #[test]
    fn row_operations_stop_after_one_row() {
        let ops: [(&str, RowOp); 6] = [
            ("add", add),
            ("sub", sub),
            ("hadamard", hadamard),
            ("mult", mult),
            ("div", div),
            ("trans", |a, _b, r, control| trans(a, r, control)),
        ];
        for (name, op) in ops {
            assert_stops_after_first_row(name, op);
        }
    }

    #[test]
    fn frobenius_stops_after_one_row() {
        let n = 8;
        let a = m(n, &vec![1.0; n * n]);
        let polls = Cell::new(0);
        let stop = || {
            polls.set(polls.get() + 1);
            false
        };
        assert_eq!(frobenius(&a, &a, &stop), None);
        assert_eq!(polls.get(), 1);
    }

    #[test]
    fn operands_draw_a_and_b_alternately() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(17);
        let ops = initialize_operands(3, &mut rng);

        let mut replay = StdRng::seed_from_u64(17);
        for k in 0..9 {
            let (i, j) = (k / 3, k % 3);
            assert_eq!(ops.a.get(i, j), replay.next_u32() as Element * NORMALIZE);
            assert_eq!(ops.b.get(i, j), replay.next_u32() as Element * NORMALIZE);
        }
        assert!(ops.r.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn prod_stops_after_one_pair() {
        let n = 4;
        let a = m(n, &vec![1.0; n * n]);
        let b = m(n, &vec![1.0; n * n]);
        let mut r = Matrix::zeros(n);
        let polls = Cell::new(0);
        let control = || {
            polls.set(polls.get() + 1);
            polls.get() < 3
        };
        prod(&a, &b, &mut r, &control);
        assert_eq!(polls.get(), 3);
        assert_eq!(&r.as_slice()[..3], &[4.0, 4.0, 4.0]);
        assert!(r.as_slice()[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn compare_results_uses_tolerance() {
        let x = m(1, &[1.0]);
        let y = m(1, &[1.0005]);
        assert!(compare_results(&x, &y, 1e-3));
        assert!(!compare_results(&x, &y, 1e-4));
        assert!(!compare_results(&x, &Matrix::zeros(2), 1.0));
    }
}
