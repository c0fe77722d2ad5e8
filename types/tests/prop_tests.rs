use proptest::prelude::*;

use volunteer_types::{Group, Member, Principal, Timestamp};

fn member_strategy() -> impl Strategy<Value = Member> {
    ("[a-c]{1,2}", "[a-z]{0,6}", "[a-z]{1,6}", "p-[0-2]").prop_map(
        |(name, location, specialist, id)| Member {
            name,
            location,
            specialist,
            registration_id: Principal::new(id),
        },
    )
}

fn base_group() -> Group {
    Group {
        id: 7,
        name: "g".to_string(),
        country: "c".to_string(),
        contact_number: "1".to_string(),
        official_email: "e@x".to_string(),
        service: "s".to_string(),
        created_at: Timestamp::new(10),
        members: Vec::new(),
    }
}

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Appending then removing by name leaves no member of that name and
    /// keeps every other member in its original order.
    #[test]
    fn remove_by_name_keeps_others_in_order(
        roster in prop::collection::vec(member_strategy(), 0..8),
        extra in member_strategy(),
    ) {
        let mut group = base_group();
        for m in roster {
            group = group.with_member(m);
        }
        let joined = group.with_member(extra.clone());
        prop_assert!(joined.has_member(&extra.name, &extra.registration_id));

        let left = joined.without_members_named(&extra.name);
        prop_assert!(left.members.iter().all(|m| m.name != extra.name));
        let expected: Vec<Member> = group
            .members
            .iter()
            .filter(|m| m.name != extra.name)
            .cloned()
            .collect();
        prop_assert_eq!(left.members, expected);
    }

    /// Group bincode serialization roundtrip preserves the full roster.
    #[test]
    fn group_bincode_roundtrip(roster in prop::collection::vec(member_strategy(), 0..5)) {
        let mut group = base_group();
        for m in roster {
            group = group.with_member(m);
        }
        let encoded = bincode::serialize(&group).unwrap();
        let decoded: Group = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, group);
    }
}
