use predicates::str::diff;

#[test]
fn show_config_prints_defaults() {
    let expected = concat!(
        "Arrival rate: 360/h\n",
        "Mean talk: 540s\n",
        "Mean after-call work: 60s\n",
        "SLA: 80% within 20s\n",
        "Max occupancy: 85%\n",
        "Shrinkage: 20%\n",
        "Agents: 12 (10 active)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cc-sim");
    cmd.arg("show-config");
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_config_applies_flags_and_coerces_out_of_range() {
    let expected = concat!(
        "Arrival rate: 120/h\n",
        "Mean talk: 300s\n",
        "Mean after-call work: 60s\n",
        "SLA: 90% within 15s\n",
        "Max occupancy: 85%\n",
        "Shrinkage: 20%\n",
        "Agents: 5 (4 active)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cc-sim");
    cmd.args([
        "show-config",
        "--lambda",
        "120",
        "--aht",
        "300",
        "--sla",
        "90",
        "--thr",
        "15",
        "--shrink",
        "140",
        "--agents",
        "5",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn run_with_an_oversized_pool_falls_back_to_default_staffing() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cc-sim");
    cmd.args([
        "run",
        "--agents",
        "10000000000000000000",
        "--steps",
        "1",
        "--seed",
        "3",
        "--format",
        "summary",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("staff_active: 10\n"));
}
