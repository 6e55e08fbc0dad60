use std::fs;

use assert_cmd::Command;

fn level(path: &str) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn run_corridor_astar() {
    let output = r"SearchClient
Push(E,E)
Push(E,E)
Push(E,E)
";

    Command::cargo_bin("hospital-solver")
        .unwrap()
        .arg("--astar")
        .write_stdin(level("levels/corridor.lvl"))
        .assert()
        .success()
        .stdout(output);
}

#[test]
fn run_open_default_strategy() {
    // server responses are interleaved with the level
    let input = format!("{}true\ntrue\ntrue\ntrue\n", level("levels/open.lvl"));
    let output = Command::cargo_bin("hospital-solver")
        .unwrap()
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "SearchClient");
    assert_eq!(lines[1..].iter().filter(|&&l| l == "Move(S)").count(), 2);
    assert_eq!(lines[1..].iter().filter(|&&l| l == "Move(E)").count(), 2);
}

#[test]
fn run_two_agents_wastar() {
    let output = Command::cargo_bin("hospital-solver")
        .unwrap()
        .args(&["--wastar", "3", "--seed", "42"])
        .write_stdin(level("levels/two-agents.lvl"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("SearchClient"));
    let mut steps = 0;
    for line in lines {
        assert_eq!(line.split('|').count(), 2, "{}", line);
        steps += 1;
    }
    assert!(steps > 0);
}

#[test]
fn run_unsolvable() {
    let input = r"#domain
hospital
#levelname
stuck
#colors
blue: 0
red: A
#initial
+++++
+A  +
+  0+
+++++
#goal
+++++
+   +
+ A +
+++++
#end
";

    Command::cargo_bin("hospital-solver")
        .unwrap()
        .arg("--greedy")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("SearchClient\n");
}

#[test]
fn run_memory_limit() {
    // the process alone is larger than this
    Command::cargo_bin("hospital-solver")
        .unwrap()
        .args(&["--bfs", "--max-memory", "0.001"])
        .write_stdin(level("levels/corridor.lvl"))
        .assert()
        .success()
        .stdout("SearchClient\n");
}

#[test]
fn run_bad_level() {
    Command::cargo_bin("hospital-solver")
        .unwrap()
        .write_stdin("#domain\nhospital\n#end\n")
        .assert()
        .failure()
        .stdout("SearchClient\n");
}

#[test]
fn run_bad_strategy_args() {
    // clap reports the conflict, nothing is sent to the server
    Command::cargo_bin("hospital-solver")
        .unwrap()
        .arg("--bfs")
        .arg("--dfs")
        .write_stdin(level("levels/corridor.lvl"))
        .assert()
        .failure()
        .stdout("");
}
