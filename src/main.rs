//! Sudoku ACS Solver - Command Line Interface

use clap::Parser;

use sudoku_acs_solver::cli::Cli;
use sudoku_acs_solver::coordinator::Coordinator;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let resolved = match cli.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if resolved.verbose {
        log::info!(
            "loaded {}x{} puzzle with {} cells already fixed",
            resolved.board.n(),
            resolved.board.n(),
            resolved.board.cells_filled()
        );
    }

    let coordinator = Coordinator::new(resolved.coordinator_params, &resolved.board);
    let report = coordinator.run(&resolved.board);

    if resolved.verbose {
        for (id, iterations) in report.iterations_per_colony.iter().enumerate() {
            log::info!("sub-colony {id} completed {iterations} iterations");
        }
        log::info!(
            "finished in {:.3}s, solved={}, cells filled={}/{}",
            report.elapsed.as_secs_f64(),
            report.solved,
            report.best_board.cells_filled(),
            report.best_board.num_cells()
        );
    }

    print!("{}", report.best_board.to_text());

    std::process::exit(if report.solved { 0 } else { 1 });
}
