use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lot_ledger_cli").unwrap();
    cmd.env("LOT_LEDGER_CLI_SCRIPT", "1")
        .env("LOT_LEDGER_HOME", home.path());
    cmd
}

#[test]
fn script_mode_records_and_saves_a_journal() {
    let home = TempDir::new().unwrap();
    let input = "\
journal new Gold
purchase 10 5 2024-01-01
purchase 5 6 2024-01-02
sell 12 8 2024-01-03
journal save
exit
";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("New journal `Gold` created."))
        .stdout(contains("Recorded purchase #1"))
        .stdout(contains("Recorded liquidation #3"))
        .stdout(contains("Consumed 2 lot(s)"))
        .stdout(contains("Journal saved to"));

    let saved = home.path().join("journals").join("gold.json");
    let json = std::fs::read_to_string(saved).unwrap();
    assert!(json.contains("\"Gold\""));
}

#[test]
fn oversell_is_rejected_and_reported() {
    let home = TempDir::new().unwrap();
    let input = "\
journal new Silver
purchase 2 10 2024-01-01
sell 5 12 2024-01-02
available
";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("The journal was left unchanged."))
        .stdout(contains("Available quantity: 2"));
}

#[test]
fn saved_journal_reloads_in_a_new_session() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("journal new Copper\npurchase 4 2.5 2024-03-01\njournal save\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("journal load Copper\navailable\n")
        .assert()
        .success()
        .stdout(contains("Journal `Copper` loaded."))
        .stdout(contains("Available quantity: 4"));
}

#[test]
fn commands_without_a_journal_explain_how_to_start() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("inventory\n")
        .assert()
        .success()
        .stdout(contains("No journal loaded"));
}

#[test]
fn typos_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("purchse 1 2\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `purchase`?"));
}
