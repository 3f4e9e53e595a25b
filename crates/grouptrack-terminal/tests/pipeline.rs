//! Full runs against the in-memory platform.

use assert_matches::assert_matches;
use grouptrack_authentication::Totp;
use grouptrack_core::effects::NeverCancel;
use grouptrack_core::{
    CallerIdentity, Credentials, GroupId, GroupSummary, Member, MemberUser, MembershipId,
    ReportKey, Role, RoleId, SelfMembership, TrackerConfig, TrackerError, UserId,
};
use grouptrack_effects::{
    EffectSystem, MockCall, MockGroup, MockPlatformHandler, ShutdownToken, SimulatedTimeHandler,
};
use grouptrack_terminal::{execute, RunInputs};
use std::path::Path;

const SECRET: &str = "JBSWY3DPEHPK3PXP";

fn carol() -> CallerIdentity {
    CallerIdentity {
        id: UserId::new("usr_carol"),
        display_name: "Carol".to_string(),
    }
}

fn member(user: &str, name: &str, roles: &[&str]) -> Member {
    Member {
        id: MembershipId::new(format!("gmem_{user}")),
        group_id: GroupId::new("grp_1"),
        user_id: UserId::new(user),
        user: MemberUser {
            id: UserId::new(user),
            display_name: name.to_string(),
        },
        role_ids: roles.iter().map(|r| RoleId::new(*r)).collect(),
        is_representing: false,
        joined_at: None,
        membership_status: Some("member".to_string()),
    }
}

fn group(caller_is_member: bool) -> MockGroup {
    MockGroup {
        summary: GroupSummary {
            id: GroupId::new("grp_1"),
            name: "Test Group".to_string(),
            member_count: 3,
            my_member: caller_is_member.then(|| SelfMembership {
                id: MembershipId::new("gmem_self"),
                group_id: GroupId::new("grp_1"),
                user_id: None,
                role_ids: vec![RoleId::new("grol_a"), RoleId::new("grol_b")],
                is_representing: false,
                joined_at: None,
                membership_status: Some("member".to_string()),
            }),
        },
        roles: vec![
            Role {
                id: RoleId::new("grol_a"),
                group_id: GroupId::new("grp_1"),
                name: "Data".to_string(),
                permissions: vec!["group-data-manage".to_string()],
            },
            Role {
                id: RoleId::new("grol_b"),
                group_id: GroupId::new("grp_1"),
                name: "Audit".to_string(),
                permissions: vec!["group-audit-view".to_string()],
            },
        ],
        roster: vec![
            member("usr_alice", "Alice", &["grol_a"]),
            member("usr_bob", "Bob", &["grol_b"]),
        ],
    }
}

fn inputs(output_dir: &Path) -> RunInputs {
    RunInputs {
        credentials: Credentials::new("carol", "hunter2"),
        totp_secret: SECRET.to_string(),
        group_ids: vec![GroupId::new("grp_1")],
        output_dir: output_dir.join("output"),
    }
}

fn effects(platform: MockPlatformHandler) -> EffectSystem<MockPlatformHandler, SimulatedTimeHandler> {
    let clock = SimulatedTimeHandler::at_unix_seconds(1_700_000_000);
    EffectSystem::new(platform.with_clock(clock.clone()), clock)
}

#[tokio::test]
async fn test_run_with_second_factor_writes_report() {
    let totp = Totp::from_base32(SECRET).unwrap();
    let platform = MockPlatformHandler::requiring_totp(carol())
        .with_totp_check(move |code, now| totp.code_at(now).map(|c| c == code).unwrap_or(false))
        .with_group(group(true));
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();

    let summary = execute(&effects, &NeverCancel, &TrackerConfig::default(), &inputs(temp.path()))
        .await
        .unwrap();

    assert_eq!(summary.path, temp.path().join("output").join("data.json"));
    assert_eq!(
        std::fs::read_to_string(&summary.path).unwrap(),
        r#"{"Alice":["ManageGroupData"],"Bob":["ViewAuditLog"],"Carol":["ManageGroupData","ViewAuditLog"]}"#
    );

    let calls = effects.platform().calls();
    assert_matches!(calls.first(), Some(MockCall::Login { username }) if username == "carol");
    assert!(calls.iter().any(|c| matches!(c, MockCall::VerifyTotp { .. })));
}

#[tokio::test]
async fn test_run_keyed_by_user_id() {
    let platform = MockPlatformHandler::authenticated(carol()).with_group(group(true));
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();
    let mut config = TrackerConfig::default();
    config.report.key = ReportKey::UserId;

    let summary = execute(&effects, &NeverCancel, &config, &inputs(temp.path()))
        .await
        .unwrap();

    let keys: Vec<&str> = summary.report.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["usr_alice", "usr_bob", "usr_carol"]);
}

#[tokio::test]
async fn test_non_member_writes_nothing() {
    let platform = MockPlatformHandler::authenticated(carol()).with_group(group(false));
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();

    let result = execute(&effects, &NeverCancel, &TrackerConfig::default(), &inputs(temp.path())).await;

    let err = result.unwrap_err();
    assert_matches!(err, TrackerError::NotGroupMember { .. });
    assert_eq!(err.exit_code(), 4);
    assert!(!temp.path().join("output").exists());
}

#[tokio::test]
async fn test_unknown_permission_writes_nothing() {
    let mut seeded = group(true);
    seeded.roles[1].permissions.push("group-calendar-manage".to_string());
    let platform = MockPlatformHandler::authenticated(carol()).with_group(seeded);
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();

    let result = execute(&effects, &NeverCancel, &TrackerConfig::default(), &inputs(temp.path())).await;

    assert_matches!(result, Err(TrackerError::UnknownPermission { code }) if code == "group-calendar-manage");
    assert!(!temp.path().join("output").exists());
}

#[tokio::test]
async fn test_remote_failure_exit_code() {
    let platform = MockPlatformHandler::authenticated(carol())
        .with_group(group(true))
        .failing("group_members", TrackerError::remote("Too Many Requests", 429));
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();

    let err = execute(&effects, &NeverCancel, &TrackerConfig::default(), &inputs(temp.path()))
        .await
        .unwrap_err();

    assert_matches!(err, TrackerError::Remote { code: 429, .. });
    assert_eq!(err.exit_code(), 5);
}

#[tokio::test]
async fn test_cancelled_run_makes_no_calls() {
    let platform = MockPlatformHandler::authenticated(carol()).with_group(group(true));
    let effects = effects(platform);
    let temp = tempfile::tempdir().unwrap();
    let token = ShutdownToken::new();
    token.cancel();

    let err = execute(&effects, &token, &TrackerConfig::default(), &inputs(temp.path()))
        .await
        .unwrap_err();

    assert_eq!(err, TrackerError::Cancelled);
    assert_eq!(err.exit_code(), 130);
    assert!(effects.platform().calls().is_empty());
}
