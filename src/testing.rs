use std::cell::RefCell;

use crate::client::Hub;
use crate::entity::{EntityDomain, EntityState};
use crate::error::HubError;

/// In-memory hub whose `toggle` flips the stored state.
pub(crate) struct FakeHub {
    states: RefCell<Vec<EntityState>>,
    calls: RefCell<Vec<(String, String, String)>>,
}

impl FakeHub {
    pub(crate) fn new(states: Vec<EntityState>) -> Self {
        Self {
            states: RefCell::new(states),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.borrow().clone()
    }
}

impl Hub for FakeHub {
    async fn list_entities(&self) -> Result<Vec<String>, HubError> {
        Ok(self.states.borrow().iter().map(|s| s.entity_id.clone()).collect())
    }

    async fn get_state(&self, entity_id: &str) -> Result<EntityState, HubError> {
        self.states
            .borrow()
            .iter()
            .find(|s| s.entity_id == entity_id)
            .cloned()
            .ok_or_else(|| HubError::NotFound {
                endpoint: format!("api/states/{}", entity_id),
            })
    }

    async fn call_service(
        &self,
        domain: EntityDomain,
        service: &str,
        entity_id: &str,
    ) -> Result<(), HubError> {
        self.calls
            .borrow_mut()
            .push((domain.to_string(), service.to_string(), entity_id.to_string()));
        if let Some(s) = self
            .states
            .borrow_mut()
            .iter_mut()
            .find(|s| s.entity_id == entity_id)
        {
            s.state = if s.state == "on" { "off" } else { "on" }.into();
        }
        Ok(())
    }
}
