/// Command-line front end for the clinic scheduler.
///
/// Reads one comma-separated command per line from stdin until `Q`.

use std::io::{self, BufRead, Write};

use clinic_scheduler::{ClinicConfig, ClinicError, ClinicManager};
use tracing_subscriber::EnvFilter;

const QUIT: &str = "Q";

struct ClinicCLI {
    manager: ClinicManager,
    running: bool,
}

impl ClinicCLI {
    fn new(manager: ClinicManager) -> Self {
        ClinicCLI {
            manager,
            running: true,
        }
    }

    fn run(&mut self) -> Result<(), ClinicError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write!(out, "{}", self.manager.banner())?;
        writeln!(out, "Clinic Manager is running...")?;
        out.flush()?;

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        while self.running {
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            if line == QUIT {
                self.running = false;
                continue;
            }
            write!(out, "{}", self.manager.execute(line)?)?;
            out.flush()?;
        }

        writeln!(out, "Clinic Manager terminated.")?;
        Ok(())
    }
}

fn main() -> Result<(), ClinicError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clinic_scheduler=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ClinicConfig::from_env();
    let manager = ClinicManager::from_config(config)?;
    let mut cli = ClinicCLI::new(manager);
    cli.run()
}
