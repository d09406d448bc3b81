use teamql::prelude::*;

mod common;
use common::{add, setup, usernames};

#[test]
fn search_by_equality() {
    let fx = setup();
    let member = MemberTable::new();

    let found = select_from(member)
        .r#where(eq(member.username, "member1") & eq(member.age, 10))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    assert_eq!(found.username(), Some("member1"));
    assert_eq!(found.team().id(), fx.team_a.id());
}

#[test]
fn comma_separated_conditions_are_a_conjunction() {
    let fx = setup();
    let member = MemberTable::new();

    let found = select_from(member)
        .r#where((eq(member.username, "member1"), eq(member.age, 10)))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member1")]);
}

#[test]
fn absent_conditions_are_skipped() {
    let fx = setup();
    let member = MemberTable::new();

    let username: Option<&str> = None;
    let age = Some(30);
    let found = select_from(member)
        .r#where((
            username.map(|u| eq(member.username, u)),
            age.map(|a| gte(member.age, a)),
        ))
        .order_by(asc(member.age))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member3"), Some("member4")]);

    let everything = select_from(member).r#where(None::<Predicate>);
    assert_eq!(everything.fetch_count(&fx.session).unwrap(), 4);
}

#[test]
fn template_conditions_stay_grouped() {
    let fx = setup();
    let member = MemberTable::new();

    let either = template::<Bool, _>(
        "{0} = {1} OR {2} > {3}",
        (member.username, "member1", member.age, 25),
    )
    .unwrap();
    let found = select_from(member)
        .r#where((either, eq(member.age, 40)))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member4")]);

    let none = select_from(member)
        .r#where((
            template::<Bool, _>("{0} = {1} OR {2} > {3}", (member.username, "member1", member.age, 25))
                .unwrap(),
            eq(member.age, 20),
        ))
        .fetch(&fx.session)
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn predicate_builder_accumulates() {
    let fx = setup();
    let member = MemberTable::new();

    let mut builder = PredicateBuilder::new();
    for name in ["member1", "member4"] {
        builder = builder.or(eq(member.username, name));
    }
    builder = builder.and_not(eq(member.age, 40));

    let found = select_from(member).r#where(builder).fetch(&fx.session).unwrap();
    assert_eq!(usernames(&found), [Some("member1")]);
}

#[test]
fn comparison_and_pattern_operators() {
    let fx = setup();
    let member = MemberTable::new();
    let count = |condition: Predicate| {
        select_from(member)
            .r#where(condition)
            .fetch_count(&fx.session)
            .unwrap()
    };

    assert_eq!(count(neq(member.username, "member1")), 3);
    assert_eq!(count(between(member.age, 10, 30)), 3);
    assert_eq!(count(in_list(member.age, [10, 20])), 2);
    assert_eq!(count(not_in_list(member.age, [10, 20])), 2);
    assert_eq!(count(like(member.username, "member%")), 4);
    assert_eq!(count(is_null(member.username)), 0);
    assert_eq!(count(is_not_null(member.team_id)), 4);
    assert_eq!(count(eq(member.username, "member1") | gt(member.age, 35)), 2);
}

#[test]
fn single_result_cardinality() {
    let fx = setup();
    let member = MemberTable::new();

    let none = select_from(member)
        .r#where(eq(member.username, "nobody"))
        .fetch_one(&fx.session)
        .unwrap();
    assert!(none.is_none());

    let err = select_from(member).fetch_one(&fx.session).unwrap_err();
    assert!(matches!(err, QueryError::NonUniqueResult { rows: 4 }));

    let first = select_from(member)
        .order_by(desc(member.age))
        .fetch_first(&fx.session)
        .unwrap()
        .unwrap();
    assert_eq!(first.username(), Some("member4"));
}

#[test]
fn sort_with_nulls_last() {
    let mut fx = setup();
    add(&mut fx.session, Member::anonymous(100));
    add(&mut fx.session, Member::new("member5", 100));
    add(&mut fx.session, Member::new("member6", 100));
    let member = MemberTable::new();

    let found = select_from(member)
        .r#where(eq(member.age, 100))
        .order_by((desc(member.age), asc(member.username).nulls_last()))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member5"), Some("member6"), None]);

    let found = select_from(member)
        .r#where(eq(member.age, 100))
        .order_by(asc(member.username).nulls_first())
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(found[0].username(), None);
}

#[test]
fn paging() {
    let fx = setup();
    let member = MemberTable::new();

    let page = select_from(member)
        .order_by(desc(member.username))
        .offset(1)
        .limit(2);
    assert_eq!(
        usernames(&page.fetch(&fx.session).unwrap()),
        [Some("member3"), Some("member2")]
    );

    let results = page.fetch_results(&fx.session).unwrap();
    assert_eq!(results.total, 4);
    assert_eq!(results.offset, Some(1));
    assert_eq!(results.limit, Some(2));
    assert_eq!(results.results.len(), 2);
}

#[test]
fn offset_without_limit() {
    let fx = setup();
    let member = MemberTable::new();

    let rest = select(member.username)
        .from(member)
        .order_by(asc(member.age))
        .offset(3)
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(rest, [Some("member4".to_string())]);
}

#[test]
fn distinct_values() {
    let fx = setup();
    let member = MemberTable::new();

    let teams = select_distinct(member.team_id)
        .from(member)
        .order_by(asc(member.team_id))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(teams, [fx.team_a.id(), fx.team_b.id()]);
}

#[test]
fn repeated_where_replaces_the_filter() {
    let fx = setup();
    let member = MemberTable::new();

    let found = select_from(member)
        .r#where(eq(member.username, "member1"))
        .r#where(eq(member.username, "member2"))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(usernames(&found), [Some("member2")]);
}

#[test]
fn inverse_collection() {
    let fx = setup();
    let members = fx.team_b.members(&fx.session).unwrap();
    assert_eq!(usernames(&members), [Some("member3"), Some("member4")]);

    assert!(Team::new("unsaved").members(&fx.session).unwrap().is_empty());
}
