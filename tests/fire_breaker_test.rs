//! Transcript tests for fire-breaker driven through the session loop.

use std::io::Cursor;

use rstest::rstest;

use netfire::application::{FireBreaker, Session};
use netfire::config::FireSettings;
use netfire::infrastructure::{run, InfraError, InfraResult, Outcome};

fn play(settings: FireSettings, script: &str, strict: bool) -> (InfraResult<Outcome>, Vec<String>) {
    let mut session = Session::new(FireBreaker::new(settings));
    let mut output = Vec::new();
    let result = run(&mut session, Cursor::new(script), &mut output, strict);
    let lines = String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(str::to_string)
        .collect();
    (result, lines)
}

const TRIANGLE: &str = "\
add-node 1
add-node 2
add-node 3
add-edge 1 2
add-edge 2 3
add-edge 1 3
";

#[test]
fn given_triangle_when_protecting_before_spread_then_protected_node_survives() {
    // Arrange
    let script = format!("{TRIANGLE}ignite 1\nprotect 2\nspread\nquit\n");

    // Act
    let (result, lines) = play(FireSettings::default(), &script, false);

    // Assert
    assert_eq!(result.unwrap(), Outcome::Quit);
    assert_eq!(lines.last().unwrap(), "1:burnt, 2:protected, 3:burning");
    assert_eq!(lines.len(), 9);
}

#[test]
fn given_full_game_when_played_to_the_end_then_reports_each_turn() {
    let script = "\
add-node a
add-node b
add-node c
add-node d
add-node e
add-edge a b
add-edge b c
add-edge c d
add-edge b e
ignite a
spread
protect c
spread
status
spread
spread
status
show-node d
";

    let (result, lines) = play(FireSettings::default(), script, false);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    assert_eq!(
        &lines[10..],
        [
            "a:burnt, b:burning, c:unburnt, d:unburnt, e:unburnt",
            "OK",
            "a:burnt, b:burnt, c:protected, d:unburnt, e:burning",
            "turn 2: 1 burning",
            "a:burnt, b:burnt, c:protected, d:unburnt, e:burnt",
            "a:burnt, b:burnt, c:protected, d:unburnt, e:burnt",
            "turn 3: extinguished",
            "unburnt",
        ]
    );
}

#[rstest]
#[case::double_protect("protect 2\nprotect 3\n", "Error, only 1 protect command(s) allowed per turn")]
#[case::burning_node("protect 1\n", "Error, cannot protect node '1' while it is burning")]
#[case::unknown_node("protect 9\n", "Error, unknown node '9'")]
#[case::repeated_node("protect 2 2\n", "Error, node '2' is listed more than once")]
#[case::reignite("ignite 1\n", "Error, cannot ignite node '1' while it is burning")]
#[case::self_loop("add-edge 2 2\n", "Error, self loop at '2' is not permitted")]
#[case::duplicate_node("add-node 3\n", "Error, node '3' already exists")]
fn given_illegal_move_when_played_then_error_line(#[case] moves: &str, #[case] expected: &str) {
    let script = format!("{TRIANGLE}ignite 1\n{moves}");

    let (result, lines) = play(FireSettings::default(), &script, false);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    assert_eq!(lines.last().unwrap(), expected);
}

#[test]
fn given_identical_scripts_when_played_twice_then_identical_transcripts() {
    let script = format!("{TRIANGLE}add-node 4\nadd-edge 3 4\nignite 2\nprotect 4\nspread\nspread\nshow\n");

    let (_, first) = play(FireSettings::default(), &script, false);
    let (_, second) = play(FireSettings::default(), &script, false);

    assert_eq!(first, second);
    assert_eq!(first.last().unwrap(), "1:burnt, 2:burnt, 3:burnt, 4:protected");
}

#[test]
fn given_strict_mode_when_move_rejected_then_session_ends_with_error() {
    let script = format!("{TRIANGLE}ignite 7\nshow\n");

    let (result, lines) = play(FireSettings::default(), &script, true);

    assert!(matches!(result, Err(InfraError::Application(_))));
    assert_eq!(lines.last().unwrap(), "Error, unknown node '7'");
    assert_eq!(lines.len(), 7);
}

#[test]
fn given_reset_when_replaying_then_same_outcome() {
    let round = "ignite 1\nprotect 3\nspread\nspread\n";
    let script = format!("{TRIANGLE}{round}reset\nstatus\n{round}");

    let (_, lines) = play(FireSettings::default(), &script, false);

    assert_eq!(lines[9], "1:burnt, 2:burnt, 3:protected");
    assert_eq!(lines[11], "turn 0: extinguished");
    assert_eq!(lines[15], lines[9]);
}

#[test]
fn given_contained_fire_when_game_ends_then_outcome_won_and_further_moves_refused() {
    let script = format!(
        "{TRIANGLE}add-node 4\nadd-edge 3 4\noutcome\nprotect 4\nspread\nprotect 3\nignite 1\nspread\nspread\noutcome\nignite 4\n"
    );

    let (result, lines) = play(FireSettings::default(), &script, false);

    assert_eq!(result.unwrap(), Outcome::EndOfInput);
    assert_eq!(
        &lines[8..],
        [
            "idle",
            "OK",
            "1:unburnt, 2:unburnt, 3:unburnt, 4:protected",
            "OK",
            "OK",
            "1:burnt, 2:burning, 3:protected, 4:protected",
            "1:burnt, 2:burnt, 3:protected, 4:protected",
            "won",
            "Error, game is over",
        ]
    );
}
