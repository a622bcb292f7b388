use models::system;

use super::domain::System;

/// Field copying between a domain type `D` and its stored form `E`. No validation happens here.
pub trait BaseMapper<D, E> {
    fn to_domain(&self, entity: &E) -> D;

    fn to_domain_list(&self, entities: &[E]) -> Vec<D> {
        entities.iter().map(|e| self.to_domain(e)).collect()
    }

    /// Inverse of [`BaseMapper::to_domain`].
    fn to_entity(&self, domain: &D) -> E;

    /// Copy domain fields onto an existing entity, keeping the entity's identity.
    fn update_entity(&self, domain: &D, entity: &mut E);

    /// Copy entity fields onto an existing domain object.
    fn update_domain(&self, entity: &E, domain: &mut D);
}

/// Key carried by an entity the store has not assigned yet. The identity sequence starts at 1.
pub const UNASSIGNED_ID: i32 = 0;

fn assigned(system_id: i32) -> Option<i32> {
    (system_id != UNASSIGNED_ID).then_some(system_id)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMapper;

impl BaseMapper<System, system::Model> for SystemMapper {
    fn to_domain(&self, entity: &system::Model) -> System {
        System { system_id: assigned(entity.system_id), name: entity.name.clone() }
    }

    /// An unsaved system maps to [`UNASSIGNED_ID`]; inserts never send the key to the database.
    fn to_entity(&self, domain: &System) -> system::Model {
        system::Model { system_id: domain.system_id.unwrap_or(UNASSIGNED_ID), name: domain.name.clone() }
    }

    fn update_entity(&self, domain: &System, entity: &mut system::Model) {
        entity.name.clone_from(&domain.name);
    }

    fn update_domain(&self, entity: &system::Model, domain: &mut System) {
        domain.system_id = assigned(entity.system_id);
        domain.name.clone_from(&entity.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i32, name: &str) -> system::Model {
        system::Model { system_id: id, name: name.to_string() }
    }

    #[test]
    fn entity_round_trips_through_domain() {
        let m = SystemMapper;
        let r = record(12, "Alpha");
        assert_eq!(m.to_entity(&m.to_domain(&r)), r);
    }

    #[test]
    fn persisted_domain_round_trips_through_entity() {
        let m = SystemMapper;
        let d = System { system_id: Some(5), name: "Beta".into() };
        assert_eq!(m.to_domain(&m.to_entity(&d)), d);
    }

    #[test]
    fn unsaved_domain_round_trips_through_entity() {
        let m = SystemMapper;
        let d = System::new("Alpha");
        let e = m.to_entity(&d);
        assert_eq!(e.system_id, UNASSIGNED_ID);
        assert_eq!(m.to_domain(&e), d);
    }

    #[test]
    fn unassigned_entity_round_trips_through_domain() {
        let m = SystemMapper;
        let r = record(UNASSIGNED_ID, "Gamma");
        assert_eq!(m.to_domain(&r).system_id, None);
        assert_eq!(m.to_entity(&m.to_domain(&r)), r);
    }

    #[test]
    fn list_preserves_order() {
        let m = SystemMapper;
        let rows = vec![record(3, "c"), record(1, "a"), record(2, "b")];
        let ids: Vec<Option<i32>> = m.to_domain_list(&rows).into_iter().map(|s| s.system_id).collect();
        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
        let none: Vec<system::Model> = Vec::new();
        assert!(m.to_domain_list(&none).is_empty());
    }

    #[test]
    fn update_entity_keeps_key() {
        let m = SystemMapper;
        let mut r = record(9, "old");
        m.update_entity(&System { system_id: Some(100), name: "new".into() }, &mut r);
        assert_eq!(r, record(9, "new"));
    }

    #[test]
    fn update_domain_copies_assigned_key() {
        let m = SystemMapper;
        let mut d = System::new("Alpha");
        m.update_domain(&record(1, "Alpha"), &mut d);
        assert_eq!(d, System { system_id: Some(1), name: "Alpha".into() });
    }
}
