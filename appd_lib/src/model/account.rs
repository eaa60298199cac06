use crate::model::Collection;
use crate::Error;

field_mapped! {
    /// A tenant account on the controller. The account API reports ids as strings.
    pub struct Account {
        pub id: String = "",
        pub name: String = "",
    }
}

pub type Accounts = Collection<Account>;

impl Collection<Account> {
    pub fn by_name(&self, name: &str) -> Result<&Account, Error> {
        self.find_unique(name, |a| a.name == name)
    }
}
