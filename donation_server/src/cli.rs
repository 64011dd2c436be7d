use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only non-secret variables. The Midtrans server key is never printed.
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "DONOR_HOST",
        "DONOR_PORT",
        "DONOR_DATABASE_URL",
        "DONOR_DATABASE_MAX_CONNECTIONS",
        "DONOR_NOTIFICATION_SIGNATURE_CHECKS",
        "DONOR_MIDTRANS_CLIENT_KEY",
        "DONOR_MIDTRANS_ENVIRONMENT",
        "DONOR_MIDTRANS_TIMEOUT_SECS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<38} {val:<15}");
    })
}
