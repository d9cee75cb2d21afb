//! Transcript tests for escape-networks driven through the session loop.

use std::io::Cursor;

use netfire::application::{EscapeNetworks, Session};
use netfire::config::EscapeSettings;
use netfire::infrastructure::{run, InfraResult, Outcome};
use netfire::util::testing;

fn transcript(script: &str) -> (InfraResult<Outcome>, Vec<String>) {
    testing::init_test_setup();
    let mut session = Session::new(EscapeNetworks::new(EscapeSettings::default()));
    let mut output = Vec::new();
    let result = run(&mut session, Cursor::new(script), &mut output, false);
    let lines = String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(str::to_string)
        .collect();
    (result, lines)
}

// ============================================================
// Building networks
// ============================================================

#[test]
fn given_chain_network_when_querying_flow_then_bottleneck_value() {
    // Arrange
    let script = "add NET a3b;b2c\nflow NET a c\nquit\n";

    // Act
    let (result, lines) = transcript(script);

    // Assert
    assert_eq!(result.unwrap(), Outcome::Quit);
    assert_eq!(lines, ["Added new escape network with identifier NET.", "2"]);
}

#[test]
fn given_every_command_when_run_then_exactly_one_line_each() {
    let script = "\
add NET s5a;a3t;s1b;b1t
add NET x4a
flow NET s t
flow NET x t
path NET s t
reach NET b a
neighbors NET a
vertices NET
list
list NET
print NET
remove NET x
print NET
";

    let (result, lines) = transcript(script);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    assert_eq!(
        lines,
        [
            "Added new escape network with identifier NET.",
            "Added new section x4a to escape network NET.",
            "4",
            "3",
            "s a t",
            "false",
            "t",
            "a:intermediate, b:intermediate, s:source, t:sink, x:source",
            "NET 5",
            "3 x t, 4 s t",
            "a3t;b1t;s5a;s1b;x4a",
            "Removed vertex x from escape network NET.",
            "a3t;b1t;s5a;s1b",
        ]
    );
}

// ============================================================
// Errors leave the model untouched
// ============================================================

#[test]
fn given_rejected_commands_when_interleaved_then_output_matches_clean_run() {
    let clean = "add NET a3b;b2c\nadd NET a4c\nflow NET a c\nprint NET\n";
    let noisy = "\
add NET a3b;b2c
add NET c1a
add NET b0d
add NET a3b
flow NET b c
remove NET q
add NET a4c
FLOW NET a c
flow NET a c
print NET
";

    let (_, clean_lines) = transcript(clean);
    let (result, noisy_lines) = transcript(noisy);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    let successes: Vec<_> = noisy_lines
        .iter()
        .filter(|l| !l.starts_with("Error, "))
        .cloned()
        .collect();
    assert_eq!(successes, clean_lines);
    assert_eq!(noisy_lines.len(), 10);
}

#[test]
fn given_malformed_lines_when_run_then_error_lines_and_session_continues() {
    let script = "\nadd\nadd NET ;a1b\nadd NET a1b;\nadd NET a1b;b1c\nlist\n";

    let (result, lines) = transcript(script);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Error, malformed input");
    assert_eq!(lines[1], "Error, add expects 2 argument(s), got 0");
    assert!(lines[2].starts_with("Error, malformed section"));
    assert!(lines[3].starts_with("Error, malformed section"));
    assert_eq!(lines[5], "NET 3");
}

#[test]
fn given_unknown_network_when_querying_then_error_names_it() {
    let (_, lines) = transcript("print ABC\n");
    assert_eq!(lines, ["Error, no escape network with identifier ABC"]);
}

#[test]
fn given_quit_when_more_lines_follow_then_they_are_not_read() {
    let (result, lines) = transcript("list\nquit\nlist\n");

    assert_eq!(result.unwrap(), Outcome::Quit);
    assert_eq!(lines, ["EMPTY"]);
}
