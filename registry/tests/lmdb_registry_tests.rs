//! Registry behaviour against the durable LMDB backend.

use volunteer_nullables::NullClock;
use volunteer_registry::{GroupPayload, LeavePayload, MemberPayload, Registry, RegistryError};
use volunteer_store_lmdb::LmdbEnvironment;
use volunteer_types::Principal;

const MAP_SIZE: usize = 10 * 1024 * 1024;

fn open(dir: &tempfile::TempDir) -> Registry<LmdbEnvironment, NullClock> {
    let env = LmdbEnvironment::open(dir.path(), MAP_SIZE).expect("open env");
    Registry::new(env, NullClock::new(1_700_000_000))
}

fn green_earth() -> GroupPayload {
    GroupPayload {
        name: "GreenEarth".to_string(),
        country: "Kenya".to_string(),
        contact_number: "+254700000000".to_string(),
        official_email: "info@greenearth.org".to_string(),
        service: "tree-planting".to_string(),
    }
}

fn amara() -> MemberPayload {
    MemberPayload {
        name: "Amara".to_string(),
        location: "Nairobi".to_string(),
        specialist: "tree-planting".to_string(),
        group_name: "GreenEarth".to_string(),
    }
}

#[test]
fn scenario_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let reg = open(&dir);
        reg.register_group(&green_earth()).expect("register");
        reg.volunteer(&amara(), &Principal::new("amara-principal"))
            .expect("volunteer");
    }

    let reg = open(&dir);
    let group = reg
        .get_group_by_service("tree-planting")
        .expect("lookup by service");
    assert_eq!(group.name, "GreenEarth");
    assert_eq!(group.members.len(), 1);
    assert_eq!(group.members[0].registration_id.as_str(), "amara-principal");
    assert_eq!(reg.list_all_services().expect("services"), vec!["tree-planting"]);
    assert_eq!(reg.list_all_locations().expect("locations"), vec!["Kenya"]);
    assert!(reg.verify_consistency().expect("check").is_consistent());
}

#[test]
fn id_counter_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let reg = open(&dir);
        reg.register_group(&green_earth()).expect("register");
    }

    let reg = open(&dir);
    let mut second = green_earth();
    second.name = "Roots".to_string();
    reg.register_group(&second).expect("register second");
    assert_eq!(reg.get_group_by_name("Roots").expect("get").id, 2);

    assert!(matches!(
        reg.register_group(&green_earth()),
        Err(RegistryError::GroupAlreadyRegistered(_))
    ));
}

#[test]
fn leave_is_durable() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let reg = open(&dir);
        reg.register_group(&green_earth()).expect("register");
        reg.volunteer(&amara(), &Principal::new("amara-principal"))
            .expect("volunteer");
        reg.member_leave_group(&LeavePayload {
            name: "Amara".to_string(),
            registration_id: Principal::new("amara-principal"),
            group_name: "GreenEarth".to_string(),
        })
        .expect("leave");
    }

    let reg = open(&dir);
    assert!(reg
        .get_group_by_name("GreenEarth")
        .expect("get")
        .members
        .is_empty());
    assert!(reg
        .get_group_by_location("Kenya")
        .expect("by location")
        .members
        .is_empty());
}
