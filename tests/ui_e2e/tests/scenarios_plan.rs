use std::time::Duration;

use elemental_selector::{RunConfig, TagSet};
use ui_e2e::testing::ScriptedUi;
use ui_e2e::{
    CaseFuture, CaseOutcome, Locator, Runner, SuitePlan, TestGroup, UiDriver,
    plan_for, wait_for_state,
};

fn config(pairs: &[(&str, &str)]) -> RunConfig {
    RunConfig::from_pairs(pairs.iter().copied()).unwrap()
}

fn cases<'a>(plan: &'a SuitePlan, group: &str) -> Vec<&'a str> {
    plan.groups
        .iter()
        .find(|g| g.describe == group)
        .map(|g| g.cases.iter().map(|c| c.title.as_str()).collect())
        .unwrap_or_default()
}

fn group_names(plan: &SuitePlan) -> Vec<&str> {
    plan.groups.iter().map(|g| g.describe.as_str()).collect()
}

#[test]
fn main_tag_selects_install_registration_and_os_version_suites() {
    let plan = plan_for(&config(&[("CYPRESS_TAGS", "main")])).unwrap();
    assert_eq!(
        group_names(&plan),
        vec![
            "Install Elemental Operator",
            "Install Elemental plugin",
            "Machine registration testing",
            "OS versions testing"
        ]
    );
    let registration = cases(&plan, "Machine registration testing");
    assert_eq!(
        registration.last().copied(),
        Some("Create Machine registration we will use to test adding a node")
    );
    assert!(plan.skipped.contains(&"Upgrade tests".to_string()));
}

#[test]
fn upgrade_on_k3s_uses_operator_and_extension_suites() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("K8S_VERSION_TO_PROVISION", "v1.28.5+k3s1"),
        ("RANCHER_VERSION", "2.8.5"),
    ]))
    .unwrap();

    let upgrade = cases(&plan, "Upgrade tests");
    assert!(!upgrade.contains(&"Add dev channel for RKE2 upgrade"));
    assert!(!upgrade.contains(&"Check OS Versions"));
    assert!(
        upgrade.contains(&"Upgrade one node (different methods if rke2 or k3s)")
    );
    assert_eq!(cases(&plan, "Elemental operator upgrade tests").len(), 3);
    assert_eq!(cases(&plan, "UI extension upgrade tests").len(), 3);
    assert_eq!(cases(&plan, "Machine registration for upgrade").len(), 1);
}

#[test]
fn upgrade_on_rke2_goes_through_channels() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("K8S_VERSION_TO_PROVISION", "v1.28.5+rke2r1"),
        ("RANCHER_VERSION", "2.8.5"),
    ]))
    .unwrap();
    let upgrade = cases(&plan, "Upgrade tests");
    assert_eq!(upgrade[0], "Add dev channel for RKE2 upgrade");
    assert_eq!(upgrade[1], "Check OS Versions");
    assert!(cases(&plan, "Elemental operator upgrade tests").is_empty());
    assert!(cases(&plan, "UI extension upgrade tests").is_empty());

    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("K8S_VERSION_TO_PROVISION", "v1.28.5+rke2r1"),
        ("RANCHER_VERSION", "2.9.1"),
    ]))
    .unwrap();
    let upgrade = cases(&plan, "Upgrade tests");
    assert_eq!(upgrade[0], "Check OS Versions");
}

#[test]
fn operator_upgrade_skipped_on_rancher_2_7() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("K8S_VERSION_TO_PROVISION", "v1.27.9+k3s1"),
        ("RANCHER_VERSION", "2.7.10"),
    ]))
    .unwrap();
    assert!(cases(&plan, "Elemental operator upgrade tests").is_empty());
    assert_eq!(cases(&plan, "UI extension upgrade tests").len(), 3);
}

#[test]
fn no_tags_no_tests() {
    let plan = plan_for(&config(&[])).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.skipped.len(), 8);
}

#[test]
fn operator_install_on_rancher_2_8_main() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "main"),
        ("RANCHER_VERSION", "2.8.5"),
    ]))
    .unwrap();
    assert_eq!(
        cases(&plan, "Install Elemental Operator"),
        vec!["Add local chartmuseum repo", "Install Elemental operator"]
    );
}

#[test]
fn operator_install_on_upgrade_skips_the_dev_chart() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("RANCHER_VERSION", "2.8.5"),
    ]))
    .unwrap();
    assert_eq!(group_names(&plan)[0], "Install Elemental Operator");
    assert_eq!(
        cases(&plan, "Install Elemental Operator"),
        vec!["Install Elemental operator"]
    );
}

#[test]
fn operator_install_only_through_rancher_2_8() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "main"),
        ("RANCHER_VERSION", "2.9.1"),
    ]))
    .unwrap();
    assert!(cases(&plan, "Install Elemental Operator").is_empty());
    assert!(!plan.skipped.contains(&"Install Elemental Operator".to_string()));
}

#[test]
fn plugin_repository_depends_on_ui_version() {
    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "upgrade"),
        ("ELEMENTAL_UI_VERSION", "stable"),
    ]))
    .unwrap();
    assert_eq!(
        cases(&plan, "Install Elemental plugin"),
        vec!["Enable extension support", "Install Elemental plugin"]
    );

    let plan = plan_for(&config(&[
        ("CYPRESS_TAGS", "main"),
        ("ELEMENTAL_UI_VERSION", "dev"),
    ]))
    .unwrap();
    assert_eq!(
        cases(&plan, "Install Elemental plugin")[0],
        "Add elemental-ui repo"
    );
}

#[test]
fn install_suites_are_skipped_without_main_or_upgrade() {
    let plan = plan_for(&config(&[("CYPRESS_TAGS", "other")])).unwrap();
    assert!(plan.skipped.contains(&"Install Elemental Operator".to_string()));
    assert!(plan.skipped.contains(&"Install Elemental plugin".to_string()));
}

fn passes<'a>(ui: &'a mut dyn UiDriver, _: &'a RunConfig) -> CaseFuture<'a> {
    Box::pin(async move {
        ui.navigate(&["Dashboard"]).await?;
        Ok(())
    })
}

fn times_out<'a>(ui: &'a mut dyn UiDriver, _: &'a RunConfig) -> CaseFuture<'a> {
    Box::pin(async move {
        wait_for_state(
            ui,
            &Locator::status("Cluster", "mycluster"),
            "Active",
            Duration::from_secs(5),
        )
        .await?;
        Ok(())
    })
}

#[tokio::test(start_paused = true)]
async fn failing_case_does_not_stop_the_run() {
    let cfg = config(&[("CYPRESS_TAGS", "main")]);
    let groups = vec![
        TestGroup::new("runner", ["main"])
            .unwrap()
            .case("first", &[1], passes)
            .case("stuck", &[2], times_out)
            .case("after", &[3], passes),
        TestGroup::new("broken setup", ["main"])
            .unwrap()
            .before_each(times_out)
            .case("never reached", &[4], passes),
    ];
    let plan = SuitePlan::build(groups, &TagSet::from_config(&cfg));
    let mut ui = ScriptedUi::new()
        .text(Locator::status("Cluster", "mycluster"), "Updating");

    let report = Runner::new(&cfg).run(&plan, &mut ui).await;
    let outcomes: Vec<_> = report
        .cases
        .iter()
        .map(|c| (c.title.as_str(), c.outcome == CaseOutcome::Passed))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("first", true),
            ("stuck", false),
            ("after", true),
            ("never reached", false)
        ]
    );
    assert_eq!(report.failed(), 2);
    assert!(!report.is_success());
    assert!(report.cases[1].elapsed >= Duration::from_secs(5));
    match &report.cases[1].outcome {
        CaseOutcome::Failed(reason) => assert!(reason.contains("timed out")),
        other => panic!("unexpected outcome {other:?}"),
    }
}
