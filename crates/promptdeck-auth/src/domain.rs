// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Organisational email-domain gate.

use promptdeck_core::PromptdeckError;

/// Admits only addresses under a single email domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicy {
    suffix: String,
}

impl DomainPolicy {
    pub fn new(domain: &str) -> Self {
        let domain = domain.trim().trim_start_matches('@').to_ascii_lowercase();
        Self {
            suffix: format!("@{domain}"),
        }
    }

    pub fn domain(&self) -> &str {
        &self.suffix[1..]
    }

    /// Case-insensitive suffix match on `@<domain>`. Subdomains do not match.
    pub fn allows(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        email.len() > self.suffix.len() && email.ends_with(&self.suffix)
    }

    pub fn check(&self, email: &str) -> Result<(), PromptdeckError> {
        if self.allows(email) {
            Ok(())
        } else {
            Err(PromptdeckError::AuthDomainRejected {
                email: email.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_domain_case_insensitively() {
        let policy = DomainPolicy::new("shopos.ai");
        assert!(policy.allows("dev@shopos.ai"));
        assert!(policy.allows("Dev@ShopOS.AI"));
        assert!(!policy.allows("dev@other.ai"));
        assert!(!policy.allows("dev@mail.shopos.ai"));
        assert!(!policy.allows("dev@shopos.ai.evil.com"));
    }

    #[test]
    fn bare_suffix_and_empty_addresses_are_rejected() {
        let policy = DomainPolicy::new("shopos.ai");
        assert!(!policy.allows("@shopos.ai"));
        assert!(!policy.allows(""));
    }

    #[test]
    fn leading_at_in_domain_is_tolerated() {
        assert_eq!(DomainPolicy::new("@Shopos.ai").domain(), "shopos.ai");
    }

    #[test]
    fn check_reports_the_rejected_address() {
        let err = DomainPolicy::new("shopos.ai").check("x@gmail.com").unwrap_err();
        assert!(matches!(err, PromptdeckError::AuthDomainRejected { email } if email == "x@gmail.com"));
    }
}
