//! Пример использования библиотеки: запуск стрессора из командной строки
//!
//! ```text
//! matrix_stress --matrix-size 256 --matrix-method prod --instances 4 --timeout 30
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use matrix_stress::stressor::{RecordingSink, SizePolicy};
use matrix_stress::utils::measure_time;
use matrix_stress::{
    ConfigError, ExitStatus, MatrixConfig, MatrixMethod, MatrixStressor, RunBudget, StopFlag,
};
use prettytable::{row, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Нагрузка на CPU/FPU матричными операциями.
#[derive(Parser)]
#[command(name = "matrix_stress", about = "Stress CPU/FPU with floating point matrix operations")]
struct Args {
    /// Размерность матриц, допускаются суффиксы b/k/m/g.
    #[arg(long)]
    matrix_size: Option<String>,

    /// Метод: all, add, div, frobenius, hadamard, mult, prod, sub, trans.
    #[arg(long, default_value = "all")]
    matrix_method: String,

    /// Остановиться после N операций на экземпляр (0 без ограничения).
    #[arg(long, default_value_t = 0)]
    matrix_ops: u64,

    /// Остановиться через N секунд (0 без ограничения).
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Число параллельных экземпляров.
    #[arg(long, default_value_t = 1)]
    instances: u32,

    /// Максимальный размер матриц, если размер не задан явно.
    #[arg(long, conflicts_with = "minimize")]
    maximize: bool,

    /// Минимальный размер матриц, если размер не задан явно.
    #[arg(long)]
    minimize: bool,

    /// Вывести отчет в JSON.
    #[arg(long)]
    json: bool,
}

/// Итоги одного экземпляра
#[derive(Serialize)]
struct InstanceReport {
    instance: u32,
    method: MatrixMethod,
    ops: u64,
    seconds: f64,
    ops_per_sec: f64,
    sink_values: u64,
}

#[derive(Serialize)]
struct RunReport<'a> {
    config: &'a MatrixConfig,
    matrix_size: usize,
    instances: &'a [InstanceReport],
}

fn configure(args: &Args) -> Result<MatrixConfig, ConfigError> {
    let mut config = MatrixConfig::new();
    if let Some(size) = &args.matrix_size {
        config.set_size(size)?;
    }
    config.set_method(&args.matrix_method)?;
    if args.maximize {
        config.set_policy(SizePolicy::Maximize);
    } else if args.minimize {
        config.set_policy(SizePolicy::Minimize);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match configure(&args) {
        Ok(config) => config,
        Err(err) => {
            // Список методов set_method уже вывел сам
            if !matches!(err, ConfigError::UnknownMethod(_)) {
                eprintln!("{err}");
            }
            std::process::exit(ExitStatus::Failure.code());
        }
    };

    let stressor = MatrixStressor::new(config);
    let n = stressor.config().effective_size();
    println!(
        "Запуск {} экземпляр(ов), метод {}, матрицы {}x{}",
        args.instances,
        stressor.config().method(),
        n,
        n
    );

    let stop = StopFlag::new();
    let counters: Vec<AtomicU64> = (0..args.instances).map(|_| AtomicU64::new(0)).collect();
    let max_ops = args.matrix_ops;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Не удалось задать стиль прогресса")?,
    );

    let reports = thread::scope(|s| -> Result<Vec<InstanceReport>> {
        let handles: Vec<_> = counters
            .iter()
            .zip(0u32..)
            .map(|(counter, instance)| {
                let stressor = &stressor;
                let stop = stop.clone();
                s.spawn(move || {
                    let budget = RunBudget {
                        control: &stop,
                        counter,
                        max_ops,
                    };
                    let mut rng = StdRng::from_entropy();
                    let mut sink = RecordingSink::default();
                    let (status, elapsed) = measure_time(|| {
                        stressor.run(&budget, instance, "matrix", &mut rng, &mut sink)
                    });
                    (status, elapsed, sink)
                })
            })
            .collect();

        let deadline = Instant::now() + Duration::from_secs(args.timeout);
        while handles.iter().any(|h| !h.is_finished()) {
            let total: u64 = counters.iter().map(|c| c.load(Ordering::Relaxed)).sum();
            pb.set_message(format!("операций: {total}"));
            pb.tick();
            if args.timeout != 0 && Instant::now() >= deadline {
                stop.stop();
            }
            thread::sleep(Duration::from_millis(100));
        }

        handles
            .into_iter()
            .zip(&counters)
            .zip(0u32..)
            .map(|((handle, counter), instance)| -> Result<InstanceReport> {
                let (status, elapsed, sink) = handle
                    .join()
                    .map_err(|_| anyhow!("Экземпляр {instance} завершился аварийно"))?;
                if status != ExitStatus::Success {
                    return Err(anyhow!("Экземпляр {instance} вернул {status:?}"));
                }
                let ops = counter.load(Ordering::Relaxed);
                let seconds = elapsed.as_secs_f64();
                Ok(InstanceReport {
                    instance,
                    method: stressor.config().method(),
                    ops,
                    seconds,
                    ops_per_sec: if seconds > 0.0 { ops as f64 / seconds } else { 0.0 },
                    sink_values: sink.count,
                })
            })
            .collect()
    })?;
    pb.finish_and_clear();

    if args.json {
        let report = RunReport {
            config: stressor.config(),
            matrix_size: n,
            instances: &reports,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Не удалось сериализовать отчет")?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["Экземпляр", "Метод", "Операций", "Время, с", "Операций/с"]);
    for r in &reports {
        table.add_row(row![
            r.instance,
            r.method,
            r.ops,
            format!("{:.2}", r.seconds),
            format!("{:.2}", r.ops_per_sec)
        ]);
    }
    table.printstd();

    Ok(())
}
