//! Shopping assistant chat and API health.

use storefront_api::CommerceClient;

pub(crate) async fn run_chat(
    client: &CommerceClient,
    message: &str,
    user_id: Option<&str>,
) -> anyhow::Result<()> {
    let reply = client.send_chat_message(message, user_id).await?;
    if !reply.success {
        tracing::warn!("assistant reported an unsuccessful reply");
    }
    println!("{}", reply.response);
    Ok(())
}

pub(crate) async fn run_health(client: &CommerceClient) -> anyhow::Result<()> {
    match client.health().await {
        Ok(health) => {
            println!("{}: {}", client.base_url(), health.status);
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{} unreachable: {e}", client.base_url())),
    }
}
