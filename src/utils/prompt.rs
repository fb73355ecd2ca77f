use std::io::{self, BufRead, Write};

use tracing::error;

use crate::models::CompanyDirectory;

/// Why a selection string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    NotANumber,
    OutOfRange,
}

/// Validate a 1-based menu selection against the directory length.
///
/// Pure so the re-prompt loop can stay at the boundary; the interactive
/// caller retries on `Err`, nothing else ever sees it.
pub fn validate_selection(input: &str, len: usize) -> Result<usize, SelectionError> {
    let index: usize = input
        .trim()
        .parse()
        .map_err(|_| SelectionError::NotANumber)?;
    if index == 0 || index > len {
        return Err(SelectionError::OutOfRange);
    }
    Ok(index)
}

/// Print the numbered company menu and block until the user picks a valid
/// entry, then echo and return the chosen name. Retries are unbounded.
pub fn select_company(directory: &CompanyDirectory) -> String {
    print_menu(directory);
    let stdin = io::stdin();

    loop {
        print!("Insert the number of the company: ");
        io::stdout().flush().ok();

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line).unwrap_or(0);
        if bytes_read == 0 {
            // stdin is closed, nothing left to retry with
            error!("Standard input closed before a company was selected");
            std::process::exit(1);
        }

        match validate_selection(&line, directory.len()) {
            Ok(index) => {
                // The index was validated against the directory length
                let name = directory.get(index).unwrap_or_default().to_string();
                println!("{} has been chosen.", name);
                return name;
            }
            Err(_) => println!(
                "Wrong selection, please enter a number between 1 and {}.",
                directory.len()
            ),
        }
    }
}

fn print_menu(directory: &CompanyDirectory) {
    println!("{}", "-".repeat(100));
    println!("COMPANIES OF THE IBEX35 STOCK MARKET");
    println!("{}", "-".repeat(100));
    for (number, name) in directory.names().iter().enumerate() {
        println!("{:>4}: {}", number + 1, name);
    }
}
