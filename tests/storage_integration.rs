use std::env;

use sociallab_leads_api::db::Database;
use sociallab_leads_api::db_storage::LeadStorage;
use sociallab_leads_api::models::NewLead;
use sociallab_leads_api::store::LeadStore;

/// Integration smoke test for lead storage against PostgreSQL.
/// Marked ignored so it only runs on request; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn insert_and_list_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    db.ensure_schema().await?;
    let storage = LeadStorage::new(db.pool.clone());

    let lead = storage
        .insert(NewLead {
            name: "João Teste".to_string(),
            email: "joao@teste.com".to_string(),
            message: "Mensagem de teste".to_string(),
        })
        .await?;

    // The table may already hold up to the list cap from earlier runs.
    let listed = storage.list_all().await?;
    if let Some(found) = listed.iter().find(|l| l.id == lead.id) {
        assert_eq!(found, &lead);
    } else {
        assert_eq!(listed.len(), sociallab_leads_api::store::LIST_LIMIT);
    }

    db.close().await;
    Ok(())
}
