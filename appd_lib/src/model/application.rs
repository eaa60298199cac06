use crate::error::Error;
use crate::model::Collection;

field_mapped! {
    /// A business application registered on the controller.
    pub struct Application {
        pub id: i64 = "",
        pub name: String = "",
        pub description: Option<String> = "",
    }
}

pub type Applications = Collection<Application>;

impl Collection<Application> {
    /// First application with exactly this name.
    pub fn by_name(&self, name: &str) -> Result<&Application, Error> {
        self.find_unique(name, |a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canned() -> Applications {
        Applications::from_json(&json!([
            {"id": 4, "name": "ECommerce", "description": null},
            {"id": 6, "name": "Fulfillment", "description": null}
        ]))
        .unwrap()
    }

    #[test]
    fn decodes_application_list() {
        let apps = canned();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, 4);
        assert_eq!(apps[0].name, "ECommerce");
        assert_eq!(apps[1].description, None);
    }

    #[test]
    fn by_name_finds_and_misses() {
        let apps = canned();
        assert_eq!(apps.by_name("Fulfillment").unwrap().id, 6);
        assert!(matches!(
            apps.by_name("Nonexistent"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn debug_lists_every_attribute() {
        let rendered = format!("{:?}", canned()[0]);
        assert!(rendered.contains("id: 4"));
        assert!(rendered.contains("name: \"ECommerce\""));
        assert!(rendered.contains("description: None"));
    }
}
