//! Wallet opening policy.

/// Role names and amounts that drive wallet creation.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletPolicy {
    /// Starting balance of the member role; also the refill target.
    pub initial_allowance: f64,
    /// The distinguished "standard member" role.
    pub member_role: String,
    /// Administrators never get a wallet and may manage every wallet.
    pub admin_role: String,
}

impl Default for WalletPolicy {
    fn default() -> Self {
        Self {
            initial_allowance: 100.0,
            member_role: "utente".to_string(),
            admin_role: "admin".to_string(),
        }
    }
}

impl WalletPolicy {
    pub fn is_admin(&self, role: &str) -> bool {
        self.admin_role.eq_ignore_ascii_case(role.trim())
    }

    pub fn is_member(&self, role: &str) -> bool {
        self.member_role.eq_ignore_ascii_case(role.trim())
    }

    /// Opening balance for a newly registered user of `role`.
    pub fn opening_balance(&self, role: &str) -> f64 {
        if self.is_member(role) {
            self.initial_allowance
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_compare_case_insensitively() {
        let policy = WalletPolicy::default();

        assert!(policy.is_admin("ADMIN"));
        assert!(policy.is_member(" Utente "));
        assert!(!policy.is_member("admin"));
    }

    #[test]
    fn only_members_get_an_allowance() {
        let policy = WalletPolicy {
            initial_allowance: 250.0,
            ..Default::default()
        };

        assert_eq!(policy.opening_balance("utente"), 250.0);
        assert_eq!(policy.opening_balance("membro"), 0.0);
    }
}
