use teamql::prelude::*;

mod common;
use common::{add, setup, usernames};

#[test]
fn inner_join_through_relationship() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let found = select_from(member)
        .join(member.team(), team)
        .unwrap()
        .r#where(eq(team.name, "teamA"))
        .order_by(asc(member.username))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member1"), Some("member2")]);
}

#[test]
fn inverse_join_from_team() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let rows = select((team.name, member.username))
        .from(team)
        .inner_join(team.members(), member)
        .unwrap()
        .r#where(gt(member.age, 25))
        .order_by(asc(member.age))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(
        rows,
        [
            (Some("teamB".to_string()), Some("member3".to_string())),
            (Some("teamB".to_string()), Some("member4".to_string())),
        ]
    );
}

#[test]
fn left_join_with_on_filter_keeps_every_member() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let rows = select((member, optional(team)))
        .from(member)
        .left_join(member.team(), team)
        .and_then(|q| q.on(eq(team.name, "teamA")))
        .unwrap()
        .order_by(asc(member.age))
        .fetch(&fx.session)
        .unwrap();

    assert_eq!(rows.len(), 4);
    let teams: Vec<Option<&str>> = rows
        .iter()
        .map(|(_, team)| team.as_ref().and_then(Team::name))
        .collect();
    assert_eq!(teams, [Some("teamA"), Some("teamA"), None, None]);
}

#[test]
fn left_joined_columns_must_be_optional() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let err = select((member.username, team.id))
        .from(member)
        .left_join(member.team(), team)
        .and_then(|q| q.on(eq(team.name, "teamA")))
        .unwrap()
        .fetch(&fx.session)
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Build(BuildError::LeftJoinedSelection { alias: "team", .. })
    ));

    let rows = select((member.username, optional(team.id)))
        .from(member)
        .left_join(member.team(), team)
        .and_then(|q| q.on(eq(team.name, "teamA")))
        .unwrap()
        .order_by(asc(member.age))
        .fetch(&fx.session)
        .unwrap();
    let ids: Vec<Option<i64>> = rows.into_iter().map(|(_, id)| id).collect();
    assert_eq!(ids, [fx.team_a.id(), fx.team_a.id(), None, None]);
}

#[test]
fn inner_join_with_on_filter_drops_rows() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let found = select_from(member)
        .join(member.team(), team)
        .and_then(|q| q.on(eq(team.name, "teamA")))
        .unwrap()
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn join_on_unrelated_columns() {
    let mut fx = setup();
    add(&mut fx.session, Member::new("teamA", 0));
    add(&mut fx.session, Member::new("teamB", 0));
    add(&mut fx.session, Member::new("teamC", 0));
    let member = MemberTable::new();
    let team = TeamTable::new();

    let rows = select((member.username, team.name))
        .from(member)
        .join_on(team, eq(member.username, team.name))
        .unwrap()
        .order_by(asc(team.name))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(
        rows,
        [
            (Some("teamA".to_string()), Some("teamA".to_string())),
            (Some("teamB".to_string()), Some("teamB".to_string())),
        ]
    );

    let rows = select((member.username, optional(team.name)))
        .from(member)
        .left_join_on(team, eq(member.username, team.name))
        .unwrap()
        .r#where(eq(member.age, 0))
        .order_by(asc(member.username))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(rows.last(), Some(&(Some("teamC".to_string()), None)));
}

#[test]
fn fetch_join_loads_the_team() {
    let fx = setup();
    let member = MemberTable::new();
    let team = TeamTable::new();

    let found = select_from(member)
        .join(member.team(), team)
        .and_then(|q| q.fetch_join())
        .unwrap()
        .r#where(eq(member.username, "member1"))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    assert_eq!(found.team().loaded().and_then(Team::name), Some("teamA"));

    let lazy = select_from(member)
        .r#where(eq(member.username, "member1"))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    assert!(!lazy.team().is_loaded());
    assert_eq!(lazy.team().id(), fx.team_a.id());
}

#[test]
fn left_fetch_join_without_team() {
    let mut fx = setup();
    add(&mut fx.session, Member::new("free agent", 50));
    let member = MemberTable::new();
    let team = TeamTable::new();

    let found = select_from(member)
        .left_join(member.team(), team)
        .and_then(|q| q.fetch_join())
        .unwrap()
        .r#where(eq(member.age, 50))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    assert_eq!(*found.team(), Association::Unassigned);
}

#[test]
fn fetch_join_needs_an_entity_projection() {
    let member = MemberTable::new();
    let team = TeamTable::new();

    let err = select(member.username)
        .from(member)
        .join(member.team(), team)
        .and_then(|q| q.fetch_join())
        .unwrap_err();
    assert_eq!(err, BuildError::FetchJoinTarget { alias: "team" });
}

#[test]
fn self_join_needs_distinct_aliases() {
    let member = MemberTable::new();

    let err = select_from(member)
        .join_on(member, eq(member.age, member.age))
        .unwrap_err();
    assert_eq!(err, BuildError::DuplicateAlias { alias: "member" });

    let other = MemberTable::aliased("other");
    assert!(select_from(member)
        .join_on(other, eq(member.age, other.age))
        .is_ok());
}

#[test]
fn unjoined_columns_fail_before_execution() {
    let member = MemberTable::new();
    let team = TeamTable::new();

    let err = select_from(member)
        .r#where(eq(team.name, "teamA"))
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::UnjoinedSource { alias: "team" });
}
