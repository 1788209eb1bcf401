/// Property-based tests using proptest
/// Tests invariants and properties that should hold for all inputs
use proptest::prelude::*;
use sociallab_leads_api::models::LeadCreate;
use sociallab_leads_api::store::{LeadStore, MemoryLeadStore};
use sociallab_leads_api::validation::{
    is_valid_email, validate_lead, MESSAGE_MAX_CHARS, NAME_MAX_CHARS, SPECIAL_USE_DOMAINS,
};

fn submission(nome: &str, email: &str, mensagem: &str) -> LeadCreate {
    LeadCreate {
        nome: Some(nome.to_string()),
        email: Some(email.to_string()),
        mensagem: Some(mensagem.to_string()),
    }
}

// Property: validation should never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn lead_validation_never_panics(nome in "\\PC*", email in "\\PC*", mensagem in "\\PC*") {
        let _ = validate_lead(submission(&nome, &email, &mensagem));
    }
}

// Property: well-formed submissions are accepted unchanged
proptest! {
    #[test]
    fn valid_submissions_accepted(
        nome in "\\PC{1,100}",
        local in "[a-z][a-z0-9._+-]{0,20}[a-z0-9]",
        domain in "[a-z][a-z0-9]{1,15}",
        tld in "[a-z]{2,6}",
        mensagem in "\\PC{1,1000}"
    ) {
        prop_assume!(!local.contains(".."));
        prop_assume!(!SPECIAL_USE_DOMAINS.contains(&tld.as_str()));
        let email = format!("{}@{}.{}", local, domain, tld);

        let lead = validate_lead(submission(&nome, &email, &mensagem));
        prop_assert!(lead.is_ok(), "rejected valid submission: {:?}", lead);

        let lead = lead.unwrap();
        prop_assert_eq!(lead.name, nome);
        prop_assert_eq!(lead.email, email);
        prop_assert_eq!(lead.message, mensagem);
    }

    #[test]
    fn uppercase_domains_normalized(
        local in "[A-Za-z][A-Za-z0-9]{0,10}",
        domain in "[A-Z]{2,10}",
        tld in "[A-Z]{2,4}"
    ) {
        prop_assume!(!SPECIAL_USE_DOMAINS.contains(&tld.to_lowercase().as_str()));
        let email = format!("{}@{}.{}", local, domain, tld);
        let lead = validate_lead(submission("Ana", &email, "Oi")).unwrap();

        let expected = format!("{}@{}.{}", local, domain.to_lowercase(), tld.to_lowercase());
        prop_assert_eq!(lead.email, expected);
    }
}

// Property: each single violation is rejected on that field only
proptest! {
    #[test]
    fn overlong_names_rejected(extra in 1usize..50) {
        let nome = "n".repeat(NAME_MAX_CHARS + extra);
        let err = validate_lead(submission(&nome, "a@b.co", "Oi")).unwrap_err();

        prop_assert_eq!(err.errors.len(), 1);
        prop_assert_eq!(err.errors[0].field.as_str(), "nome");
    }

    #[test]
    fn overlong_messages_rejected(extra in 1usize..200) {
        let mensagem = "m".repeat(MESSAGE_MAX_CHARS + extra);
        let err = validate_lead(submission("Ana", "a@b.co", &mensagem)).unwrap_err();

        prop_assert_eq!(err.errors.len(), 1);
        prop_assert_eq!(err.errors[0].field.as_str(), "mensagem");
    }

    #[test]
    fn emails_without_at_rejected(email in "[a-z0-9.]{0,30}") {
        prop_assert!(!is_valid_email(&email));
        prop_assert!(validate_lead(submission("Ana", &email, "Oi")).is_err());
    }

    #[test]
    fn emails_without_dotted_domain_rejected(local in "[a-z]{1,10}", domain in "[a-z0-9-]{1,20}") {
        let email = format!("{}@{}", local, domain);
        prop_assert!(!is_valid_email(&email));
    }
}

// Property: inserted leads get unique ids and round-trip through list_all
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn inserted_leads_round_trip(names in prop::collection::vec("[A-Za-z ]{1,30}", 1..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let store = MemoryLeadStore::new();
            let mut inserted = Vec::new();
            for (n, name) in names.iter().enumerate() {
                let email = format!("lead{}@example.com", n);
                let new_lead = validate_lead(submission(name, &email, "Oi")).unwrap();
                inserted.push(store.insert(new_lead).await.unwrap());
            }

            let listed = store.list_all().await.unwrap();
            assert_eq!(listed, inserted);

            let mut ids: Vec<_> = listed.iter().map(|lead| lead.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), names.len());
        });
    }
}
