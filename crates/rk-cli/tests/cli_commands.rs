//! Integration tests for the `rk` command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rk").unwrap();
    cmd.env_remove("RK_DIR")
        .env("NO_COLOR", "1")
        .args(["-d", dir.path().to_str().unwrap()]);
    cmd
}

/// A data directory with the player role selected.
fn player_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    rk(&dir).args(["role", "set", "player"]).assert().success();
    dir
}

/// A data directory with three logged rolls: two d20s and a 2d6.
fn dir_with_rolls() -> TempDir {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d20", "--seed", "1", "--context", "attack"])
        .assert()
        .success();
    rk(&dir)
        .args(["roll", "d20+2", "--seed", "2", "--character", "Mira"])
        .assert()
        .success();
    rk(&dir)
        .args(["roll", "2d6", "--seed", "3", "--session", "night-1"])
        .assert()
        .success();
    dir
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_logs_expression() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "2d6+3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Rolling 2d6+3")
                .and(predicate::str::contains("Total:"))
                .and(predicate::str::contains("logged as #1")),
        );
    assert!(dir.path().join("rollkeeper.db").exists());
}

#[test]
fn roll_with_advantage() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d20", "--adv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(advantage)"));
}

#[test]
fn roll_adv_and_dis_conflict() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d20", "--adv", "--dis"])
        .assert()
        .failure();
}

#[test]
fn roll_is_deterministic_with_seed() {
    let dir = TempDir::new().unwrap();
    let first = rk(&dir)
        .args(["roll", "4d6-1", "--seed", "42", "--no-log"])
        .output()
        .unwrap();
    let second = rk(&dir)
        .args(["roll", "4d6-1", "--seed", "42", "--no-log"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roll_no_log_skips_history() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d8", "--no-log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logged as").not());
    assert!(!dir.path().join("rollkeeper.db").exists());
}

#[test]
fn roll_rejects_one_sided_die() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 sides"));
}

#[test]
fn roll_rejects_zero_dice() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "0d6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 100"));
}

#[test]
fn roll_rejects_too_many_dice() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "4000000000d6", "--no-log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 100"));
}

#[test]
fn roll_with_extreme_modifier_saturates() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "d20+9223372036854775807"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 9223372036854775807"));
    rk(&dir)
        .args(["export", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(",9223372036854775807,9223372036854775807,"));
}

#[test]
fn roll_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["roll", "fireball"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid dice expression"));
}

// ---------------------------------------------------------------------------
// role
// ---------------------------------------------------------------------------

#[test]
fn role_show_without_selection() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["role", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No role selected"));
}

#[test]
fn role_set_persists() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["role", "set", "dm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dungeon Master"));
    assert!(dir.path().join("profile.json").exists());

    rk(&dir)
        .args(["role", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dungeon Master").and(predicate::str::contains("3 slots")));
}

#[test]
fn role_set_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["role", "set", "bard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid role"));
}

#[test]
fn role_clear() {
    let dir = player_dir();
    rk(&dir).args(["role", "clear"]).assert().success();
    rk(&dir)
        .args(["role", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No role selected"));
}

#[test]
fn corrupt_role_reads_as_unselected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("profile.json"),
        r#"{ "role": "wizard", "configs": [] }"#,
    )
    .unwrap();
    rk(&dir)
        .args(["role", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No role selected"));
}

// ---------------------------------------------------------------------------
// slot
// ---------------------------------------------------------------------------

#[test]
fn slot_requires_role() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["slot", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no role selected"));
}

#[test]
fn slot_list_shows_starter_slots() {
    let dir = player_dir();
    rk(&dir)
        .args(["slot", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Attack")
                .and(predicate::str::contains("Damage"))
                .and(predicate::str::contains("Skill Check")),
        );
}

#[test]
fn slot_add_and_roll() {
    let dir = player_dir();
    rk(&dir)
        .args([
            "slot",
            "add",
            "Fireball",
            "d6",
            "--modifier",
            "flat:+3",
            "--mode",
            "adv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added slot").and(predicate::str::contains("d6 advantage +3")));

    rk(&dir)
        .args(["slot", "roll", "fireball"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Fireball (d6)")
                .and(predicate::str::contains("dropped"))
                .and(predicate::str::contains("logged as #1")),
        );

    rk(&dir)
        .args(["history", "--context", "Fireball"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rolls"));
}

#[test]
fn slot_add_rejects_bad_die() {
    let dir = player_dir();
    rk(&dir)
        .args(["slot", "add", "Odd", "d1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown die"));
}

#[test]
fn slot_add_rejects_bad_modifier() {
    let dir = player_dir();
    rk(&dir)
        .args(["slot", "add", "Odd", "d6", "--modifier", "sparkle:4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid modifier"));
}

#[test]
fn slot_cap_is_enforced() {
    let dir = player_dir();
    // Three starter slots plus 22 more reaches the cap.
    for i in 0..22 {
        rk(&dir)
            .args(["slot", "add", &format!("Extra {i}"), "d4"])
            .assert()
            .success();
    }
    rk(&dir)
        .args(["slot", "add", "One Too Many", "d4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than 25"));
}

#[test]
fn slot_remove() {
    let dir = player_dir();
    rk(&dir)
        .args(["slot", "remove", "damage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed slot \"Damage\""));
    rk(&dir)
        .args(["slot", "roll", "damage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot not found"));
}

#[test]
fn slot_roll_all_keeps_tally() {
    let dir = player_dir();
    rk(&dir)
        .args(["slot", "roll", "--all"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("running total")
                .and(predicate::str::contains("Tally:"))
                .and(predicate::str::contains("3 rolls")),
        );
}

#[test]
fn slot_roll_needs_target() {
    let dir = player_dir();
    rk(&dir).args(["slot", "roll"]).assert().failure();
}

#[test]
fn slot_roll_tags_session() {
    let dir = player_dir();
    rk(&dir)
        .args(["--session", "s1", "slot", "roll", "attack"])
        .assert()
        .success();
    rk(&dir)
        .args(["slot", "roll", "--all", "--session", "s2"])
        .assert()
        .success();
    rk(&dir)
        .args(["history", "--session", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rolls").and(predicate::str::contains("Attack")));
    rk(&dir)
        .args(["history", "-s", "s2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rolls"));
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

#[test]
fn history_empty() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rolls found"));
}

#[test]
fn history_lists_all_rolls() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("3 rolls")
                .and(predicate::str::contains("2d6"))
                .and(predicate::str::contains("Mira")),
        );
}

#[test]
fn history_filters() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["history", "--die", "d20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 rolls"));
    rk(&dir)
        .args(["history", "--session", "night-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 rolls"));
    rk(&dir)
        .args(["history", "--range", "today", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 rolls"));
}

#[test]
fn history_paging() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["history", "--page", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 rolls (page 0)"));
    rk(&dir)
        .args(["history", "--page", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rolls found"));
}

#[test]
fn history_page_rejects_session() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["history", "--page", "0", "--session", "night-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be combined"));
}

#[test]
fn history_rejects_unknown_range() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["history", "--range", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown date range"));
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

#[test]
fn stats_empty_history() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rolls recorded yet"));
}

#[test]
fn stats_summarises_rolls() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["stats", "--die", "d20"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Total rolls: 3")
                .and(predicate::str::contains("Streaks"))
                .and(predicate::str::contains("Distribution (d20)")),
        );
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[test]
fn export_csv_to_stdout() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["export", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,dice_type,result,modifier,total,timestamp,session_id,context,character_name",
        ));
}

#[test]
fn export_json_with_stats() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["export", "json", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"statistics\"").and(predicate::str::contains("\"rolls\"")));
}

#[test]
fn export_markdown_to_file() {
    let dir = dir_with_rolls();
    let out = dir.path().join("rolls.md");
    rk(&dir)
        .args(["export", "markdown", "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("# Roll History"));
}

#[test]
fn export_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    rk(&dir)
        .args(["export", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported export format"));
}

// ---------------------------------------------------------------------------
// prune / delete / clear
// ---------------------------------------------------------------------------

#[test]
fn prune_keeps_recent_rolls() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["prune", "--days", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 rolls"));
}

#[test]
fn delete_removes_one_roll() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted roll #1"));
    rk(&dir)
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roll not found: 1"));
}

#[test]
fn clear_empties_history() {
    let dir = dir_with_rolls();
    rk(&dir)
        .args(["clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 3 rolls"));
    rk(&dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rolls found"));
}

// ---------------------------------------------------------------------------
// global options
// ---------------------------------------------------------------------------

#[test]
fn data_dir_from_env() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("rk")
        .unwrap()
        .env("RK_DIR", dir.path())
        .args(["roll", "d12"])
        .assert()
        .success();
    assert!(dir.path().join("rollkeeper.db").exists());
}
