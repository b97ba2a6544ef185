#[macro_use]
extern crate log;

use std::time::Instant;

use common::count_non_zero;
use dialoguer::{theme::ColorfulTheme, Select};
use shrinkage_paths::{Comparison, Explorer, ExplorerConfig, ShrinkagePath};

const SEED: u64 = 42;
/// Penalties offered for the detailed comparison
const PENALTIES: [f64; 8] = [0.0001, 0.001, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0];

pub(crate) fn main() {
    pretty_env_logger::init();

    let t0 = Instant::now();
    let mut explorer = match Explorer::new(ExplorerConfig::default(), SEED) {
        Ok(explorer) => explorer,
        Err(e) => {
            error!("could not build the initial dataset: {}", e);
            return;
        }
    };
    info!("initial dataset and paths took {}ms", t0.elapsed().as_millis());
    print_paths(&explorer);

    let mut seed = SEED;
    let mut items: Vec<String> = PENALTIES.iter().map(|p| format!("lambda = {}", p)).collect();
    items.push("Regenerate dataset".to_string());
    items.push("Quit".to_string());

    loop {
        let e = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select penalty for detailed metrics")
            .items(&items)
            .default(4)
            .interact()
            .unwrap();

        if e < PENALTIES.len() {
            match explorer.compare_at(PENALTIES[e]) {
                Ok(comparison) => print_comparison(&comparison),
                Err(e) => error!("comparison failed: {}", e),
            }
        } else if e == PENALTIES.len() {
            seed += 1;
            let t0 = Instant::now();
            match explorer.regenerate(seed) {
                Ok(()) => {
                    info!("regeneration took {}ms", t0.elapsed().as_millis());
                    print_paths(&explorer);
                }
                Err(e) => error!("regeneration failed, keeping the previous dataset: {}", e),
            }
        } else {
            break;
        }
    }
}

fn print_paths(explorer: &Explorer) {
    let state = explorer.state();
    println!(
        "\nseed {}: {} samples, {} features ({} informative), {} train / {} test rows",
        state.seed,
        state.dataset.n_samples(),
        state.dataset.n_features(),
        count_non_zero(state.dataset.true_coef()),
        state.train.n_samples(),
        state.test.n_samples(),
    );
    print_path("Lasso coefficients (L1)", &state.paths.lasso);
    print_path("Ridge coefficients (L2)", &state.paths.ridge);
}

fn print_path(title: &str, path: &ShrinkagePath) {
    println!("\n{}", title);
    for point in path.points.iter() {
        let coefs: Vec<String> = point.coefficients.iter().map(|c| format!("{:>8.3}", c)).collect();
        println!("{:>10.3e} |{}", point.penalty, coefs.join(""));
    }
}

fn print_comparison(comparison: &Comparison) {
    let n_features = comparison.true_coef.len();
    let (lasso, ridge) = (&comparison.lasso, &comparison.ridge);

    println!("\nModel performance at lambda = {}", comparison.penalty);
    println!("{:<16}{:>12}{:>12}", "Metric", "Lasso", "Ridge");
    println!("{:<16}{:>12.4}{:>12.4}", "Train MSE", lasso.train_mse, ridge.train_mse);
    println!("{:<16}{:>12.4}{:>12.4}", "Test MSE", lasso.test_mse, ridge.test_mse);
    println!("{:<16}{:>12.4}{:>12.4}", "Train R2", lasso.train_r2, ridge.train_r2);
    println!("{:<16}{:>12.4}{:>12.4}", "Test R2", lasso.test_r2, ridge.test_r2);
    println!(
        "{:<16}{:>12}{:>12}",
        "Non-zero coefs",
        format!("{}/{}", lasso.non_zero, n_features),
        format!("{}/{}", ridge.non_zero, n_features)
    );
    if !lasso.converged {
        warn!("lasso hit its sweep cap at lambda = {}", comparison.penalty);
    }

    println!("\n{:<10}{:>12}{:>12}{:>12}", "Feature", "True", "Lasso", "Ridge");
    // Only the first 20 rows, wide datasets would flood the terminal
    for j in 0..n_features.min(20) {
        println!(
            "{:<10}{:>12.4}{:>12.4}{:>12.4}",
            format!("F{}", j),
            comparison.true_coef[j],
            lasso.coefficients[j],
            ridge.coefficients[j]
        );
    }
}
