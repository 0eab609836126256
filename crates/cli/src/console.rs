//! `gatepass console` -- interactive checkpoint shell.
//!
//! Loads the officer's recent validations on start, then reads one command
//! per line from stdin. A line that is not a known command is treated as a
//! typed access code, so an officer can simply enter codes one after another.

use std::io::{self, BufRead, Write};

use gatepass_controller::ValidationController;
use gatepass_gateway::HttpGateway;
use tokio::runtime::Runtime;

use crate::render;
use crate::OutputFormat;

/// Run the console until `quit` or end of input. Returns the process exit status.
pub(crate) fn run_console(rt: &Runtime, gateway: HttpGateway, output: OutputFormat) -> i32 {
    let controller = rt.block_on(ValidationController::mount(gateway));

    if output == OutputFormat::Text {
        println!();
        println!("  Gatepass checkpoint console");
        println!("  {}", controller.gateway().config().base_url);
        println!();
        println!("  Commands: code, qr, history, status, reset, help, quit");
        println!();
        println!("{}", render::history_text(&controller.snapshot().history));
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        if output == OutputFormat::Text {
            print!("gatepass> ");
            if io::stdout().flush().is_err() {
                break;
            }
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("error reading input: {}", e);
                break;
            }
        }

        let input = line.trim_end_matches(&['\r', '\n'][..]);
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, payload) = split_command(input);
        let cmd = cmd.to_lowercase();

        match cmd.as_str() {
            "help" | "?" => print_help(),
            "code" | "c" => {
                if payload.trim().is_empty() {
                    eprintln!("usage: code <access_code>");
                    continue;
                }
                rt.block_on(controller.validate(payload));
                show_verdict(&controller, output);
            }
            "qr" => {
                if payload.trim().is_empty() {
                    eprintln!("usage: qr <decoded_qr_payload>");
                    continue;
                }
                rt.block_on(controller.validate_qr(payload));
                show_verdict(&controller, output);
            }
            "history" | "h" => {
                rt.block_on(controller.fetch_history());
                let snap = controller.snapshot();
                match output {
                    OutputFormat::Text => println!("{}", render::history_text(&snap.history)),
                    OutputFormat::Json => render::print_json(&snap.history),
                }
            }
            "status" => show_verdict(&controller, output),
            "reset" => {
                controller.reset();
                show_verdict(&controller, output);
            }
            "quit" | "exit" => break,
            _ if payload.trim().is_empty() => {
                rt.block_on(controller.validate(trimmed));
                show_verdict(&controller, output);
            }
            _ => {
                eprintln!(
                    "unknown command: {}. Type 'help' for available commands.",
                    cmd
                );
            }
        }
    }

    0
}

/// Split a console line into its command word and the text after the
/// first separator. The payload keeps whatever the officer typed.
fn split_command(input: &str) -> (&str, &str) {
    let line = input.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((cmd, payload)) => (cmd, payload),
        None => (line, ""),
    }
}

fn show_verdict(controller: &ValidationController<HttpGateway>, output: OutputFormat) {
    let snap = controller.snapshot();
    match output {
        OutputFormat::Text => println!("{}", render::verdict_text(&snap)),
        OutputFormat::Json => render::print_json(&snap),
    }
}

fn print_help() {
    println!();
    println!("  code <CODE>     Validate a typed access code (or just type the code)");
    println!("  qr <PAYLOAD>    Validate a decoded QR payload, sent verbatim");
    println!("  history         Refresh and show recent validations");
    println!("  status          Show the current verdict");
    println!("  reset           Clear the verdict and return to ready");
    println!("  help            Show this help");
    println!("  quit            Leave the console");
    println!();
}
