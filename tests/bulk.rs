use teamql::prelude::*;

mod common;
use common::{setup, usernames};

#[test]
fn bulk_update_reports_affected_rows() {
    let mut fx = setup();
    let member = MemberTable::new();

    let stale = fx
        .session
        .bulk(
            &update(member)
                .set(member.username, "비회원")
                .r#where(lt(member.age, 28)),
        )
        .unwrap();
    assert_eq!(stale.affected(), 2);
    stale.invalidate();

    let renamed = select_from(member)
        .r#where(eq(member.username, "비회원"))
        .fetch_count(&fx.session)
        .unwrap();
    assert_eq!(renamed, 2);
}

#[test]
fn stale_cache_until_invalidated() {
    let mut fx = setup();
    let member = MemberTable::new();

    let member1 = select_from(member)
        .r#where(eq(member.username, "member1"))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    let id = member1.id().unwrap();
    assert_eq!(fx.session.find::<Member>(id).unwrap().unwrap().age(), 10);

    // Kept: the cached copy no longer matches the store.
    fx.session
        .bulk(&update(member).set(member.age, member.age + 1))
        .unwrap()
        .retain_cache();
    assert_eq!(fx.session.find::<Member>(id).unwrap().unwrap().age(), 10);

    // Evicted: the next find reads the store.
    let evicted = fx
        .session
        .bulk(&update(member).set(member.age, member.age + 1))
        .unwrap()
        .invalidate();
    assert_eq!(evicted, 1);
    assert_eq!(fx.session.find::<Member>(id).unwrap().unwrap().age(), 12);
}

#[test]
fn undecided_token_evicts_on_drop() {
    let mut fx = setup();
    let member = MemberTable::new();
    assert!(fx.session.find::<Member>(1).unwrap().is_some());
    assert_eq!(fx.session.cache().len(), 1);

    {
        let _stale = fx
            .session
            .bulk(&update(member).set(member.age, 0))
            .unwrap();
    }
    assert!(fx.session.cache().is_empty());
}

#[test]
fn relative_updates() {
    let mut fx = setup();
    let member = MemberTable::new();

    fx.session
        .bulk(&update(member).set(member.age, member.age - 10))
        .unwrap()
        .invalidate();

    let ages = select(member.age)
        .from(member)
        .order_by(asc(member.age))
        .fetch(&fx.session)
        .unwrap();
    assert_eq!(ages, [0, 10, 20, 30]);
}

#[test]
fn set_null_clears_the_team() {
    let mut fx = setup();
    let member = MemberTable::new();

    let stale = fx
        .session
        .bulk(
            &update(member)
                .set_null(member.team_id)
                .r#where(eq(member.team_id, fx.team_b.id().unwrap())),
        )
        .unwrap();
    assert_eq!(stale.affected(), 2);
    stale.invalidate();

    assert!(fx.team_b.members(&fx.session).unwrap().is_empty());
}

#[test]
fn bulk_delete() {
    let mut fx = setup();
    let member = MemberTable::new();

    let stale = fx
        .session
        .bulk(&delete(member).r#where(gt(member.age, 18)))
        .unwrap();
    assert_eq!(stale.affected(), 3);
    stale.invalidate();

    let left = select_from(member).fetch(&fx.session).unwrap();
    assert_eq!(usernames(&left), [Some("member1")]);
}

#[test]
fn update_without_assignments_is_rejected() {
    let mut fx = setup();
    let member = MemberTable::new();

    let err = fx
        .session
        .bulk(&update(member).r#where(lt(member.age, 28)))
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Build(BuildError::EmptyAssignments { table: "member" })
    ));
}

#[test]
fn change_team_moves_the_member() {
    let mut fx = setup();
    let member = MemberTable::new();

    let mut member1 = select_from(member)
        .r#where(eq(member.username, "member1"))
        .fetch_one(&fx.session)
        .unwrap()
        .unwrap();
    member1.change_team(&fx.team_b);
    fx.session.persist(&mut member1).unwrap();

    let team_b = fx.team_b.members(&fx.session).unwrap();
    assert_eq!(
        usernames(&team_b),
        [Some("member1"), Some("member3"), Some("member4")]
    );
}
