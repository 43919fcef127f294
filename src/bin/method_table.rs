//! Сравнение производительности методов нагрузки на CPU
use anyhow::{ensure, Result};
use matrix_stress::matrix::{compare_results, initialize_operands, ExecContext, Matrix};
use matrix_stress::stressor::RecordingSink;
use matrix_stress::utils::measure_time;
use matrix_stress::MatrixMethod;
use prettytable::{row, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MATRIX_SIZE: usize = 256;
const NUM_ITERATIONS: u32 = 20;
const SEED: u64 = 0x5eed;

fn main() -> Result<()> {
    env_logger::init();
    println!("Сравнение методов нагрузки\n");
    println!("Размер матриц: {}x{}", MATRIX_SIZE, MATRIX_SIZE);
    println!("Итераций на метод: {}\n", NUM_ITERATIONS);

    let control = || true;
    let mut table = Table::new();
    table.add_row(row!["Метод", "Всего, мс", "Среднее, мс", "Операций/с"]);

    for &method in MatrixMethod::concrete() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut ops = initialize_operands(MATRIX_SIZE, &mut rng);
        let mut sink = RecordingSink::default();
        let mut ctx = ExecContext::new(&control, &mut sink);

        let (_, duration) = measure_time(|| {
            for _ in 0..NUM_ITERATIONS {
                method.apply(&mut ops, &mut ctx);
            }
        });

        let avg = duration.as_secs_f64() / NUM_ITERATIONS as f64;
        table.add_row(row![
            method,
            format!("{:.3}", duration.as_secs_f64() * 1000.0),
            format!("{:.3}", avg * 1000.0),
            format!("{:.1}", 1.0 / avg)
        ]);
    }
    table.printstd();

    // Проверка корректности: trans(trans(A)) == A
    println!("\nПроверка корректности...");
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut ops = initialize_operands(MATRIX_SIZE, &mut rng);
    let original = ops.a.clone();
    let mut sink = RecordingSink::default();
    let mut ctx = ExecContext::new(&control, &mut sink);
    MatrixMethod::Trans.apply(&mut ops, &mut ctx);
    std::mem::swap(&mut ops.a, &mut ops.r);
    ops.r = Matrix::zeros(MATRIX_SIZE);
    MatrixMethod::Trans.apply(&mut ops, &mut ctx);
    ensure!(
        compare_results(&ops.r, &original, 0.0),
        "Двойное транспонирование не совпало с исходной матрицей"
    );
    println!("Результаты совпадают");

    Ok(())
}
