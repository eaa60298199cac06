use crate::model::Collection;
use crate::Error;

field_mapped! {
    /// A controller configuration variable. `scope` is `cluster` or `local`.
    pub struct ConfigVariable {
        pub name: String = "",
        pub description: Option<String> = "",
        pub scope: String = "",
        pub updateable: bool = "",
        pub value: Option<String> = "",
    }
}

pub type ConfigVariables = Collection<ConfigVariable>;

impl Collection<ConfigVariable> {
    pub fn by_name(&self, name: &str) -> Result<&ConfigVariable, Error> {
        self.find_unique(name, |v| v.name == name)
    }
}
