//! Fetch, aggregate and emit against a seeded platform.

use grouptrack_core::effects::NeverCancel;
use grouptrack_core::{
    CallerIdentity, GroupId, GroupSummary, Member, MemberUser, MembershipId, PermissionId,
    ReportKey, Role, RoleId, SelfMembership, UserId,
};
use grouptrack_effects::{EffectSystem, MockGroup, MockPlatformHandler, SimulatedTimeHandler};
use grouptrack_roster::{MembershipFetcher, PermissionAggregator, ReportEmitter};

fn carol() -> CallerIdentity {
    CallerIdentity {
        id: UserId::new("usr_carol"),
        display_name: "Carol".to_string(),
    }
}

fn role(group: &str, id: &str, codes: &[&str]) -> Role {
    Role {
        id: RoleId::new(id),
        group_id: GroupId::new(group),
        name: id.to_string(),
        permissions: codes.iter().map(|c| c.to_string()).collect(),
    }
}

fn member(group: &str, user: &str, name: &str, roles: &[&str]) -> Member {
    Member {
        id: MembershipId::new(format!("gmem_{group}_{user}")),
        group_id: GroupId::new(group),
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

fn seeded_group(id: &str, roles: Vec<Role>, roster: Vec<Member>, my_roles: &[&str]) -> MockGroup {
    MockGroup {
        summary: GroupSummary {
            id: GroupId::new(id),
            name: format!("Group {id}"),
            member_count: roster.len() + 1,
            my_member: Some(SelfMembership {
                id: MembershipId::new(format!("gmem_{id}_self")),
                group_id: GroupId::new(id),
                user_id: None,
                role_ids: my_roles.iter().map(|r| RoleId::new(*r)).collect(),
                is_representing: false,
                joined_at: None,
                membership_status: Some("member".to_string()),
            }),
        },
        roles,
        roster,
    }
}

async fn run(platform: MockPlatformHandler, groups: &[&str]) -> String {
    let clock = SimulatedTimeHandler::at_unix_seconds(1_700_000_000);
    let effects = EffectSystem::new(platform.with_clock(clock.clone()), clock);
    let group_ids: Vec<GroupId> = groups.iter().map(|g| GroupId::new(*g)).collect();

    let state = MembershipFetcher::default()
        .fetch_groups(&effects, &NeverCancel, &carol(), &group_ids)
        .await
        .unwrap();
    let report = PermissionAggregator::new(ReportKey::DisplayName)
        .aggregate(&state)
        .unwrap();

    let temp = tempfile::tempdir().unwrap();
    let path = ReportEmitter::new(temp.path().join("output"))
        .emit(&report)
        .unwrap();
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_single_group_report() {
    let group = seeded_group(
        "grp_1",
        vec![
            role("grp_1", "grol_a", &["group-data-manage"]),
            role("grp_1", "grol_b", &["group-audit-view"]),
        ],
        vec![
            member("grp_1", "usr_alice", "Alice", &["grol_a"]),
            member("grp_1", "usr_bob", "Bob", &["grol_b"]),
        ],
        &["grol_a", "grol_b"],
    );

    let json = run(MockPlatformHandler::authenticated(carol()).with_group(group), &["grp_1"]).await;

    assert_eq!(
        json,
        r#"{"Alice":["ManageGroupData"],"Bob":["ViewAuditLog"],"Carol":["ManageGroupData","ViewAuditLog"]}"#
    );
}

#[tokio::test]
async fn test_owner_gets_every_permission() {
    let group = seeded_group(
        "grp_1",
        vec![
            role("grp_1", "grol_owner", &["*"]),
            role("grp_1", "grol_mod", &["group-bans-manage"]),
        ],
        vec![member("grp_1", "usr_alice", "Alice", &["grol_mod"])],
        &["grol_owner"],
    );

    let json = run(MockPlatformHandler::authenticated(carol()).with_group(group), &["grp_1"]).await;
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let carol_perms: Vec<&str> = parsed["Carol"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    let all: Vec<&str> = PermissionId::ALL.iter().map(|p| p.name()).collect();
    assert_eq!(carol_perms, all);
    assert_eq!(parsed["Alice"], serde_json::json!(["ManageGroupBans"]));
}

#[tokio::test]
async fn test_permissions_union_across_groups() {
    let first = seeded_group(
        "grp_1",
        vec![role("grp_1", "grol_1", &["group-instance-join"])],
        vec![member("grp_1", "usr_alice", "Alice", &["grol_1"])],
        &[],
    );
    let second = seeded_group(
        "grp_2",
        vec![role("grp_2", "grol_2", &["group-audit-view", "group-instance-join"])],
        vec![
            member("grp_2", "usr_alice", "Alice", &["grol_2"]),
            member("grp_2", "usr_dave", "Dave", &[]),
        ],
        &[],
    );
    let platform = MockPlatformHandler::authenticated(carol())
        .with_group(first)
        .with_group(second);

    let json = run(platform, &["grp_1", "grp_2"]).await;

    assert_eq!(
        json,
        r#"{"Alice":["ViewAuditLog","JoinGroupInstances"],"Carol":[],"Dave":[]}"#
    );
}
