use database::{DatabaseConnectionInfo, PostgrestDatabase};
use seo::client::Client;
use web::{config::SiteConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PostgrestDatabase::connect(database_connection_info)
        .expect("could not create database client.");

    // site
    let site = SiteConfig::from_env().expect("invalid site configuration in env.");

    // web server
    let state = WebState::new(Client::new(database), site);
    if let Err(why) = start_web_server(state).await {
        log::error!("web server stopped: {why}");
    }
}
