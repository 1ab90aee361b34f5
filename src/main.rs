use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use room_client::config::ClientConfig;
use room_client::router::{EventRouter, ViewUpdate};
use room_client::socket;
use room_client::store::ChatStore;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = ClientConfig::from_env();
    let Some(user_id) = config.user_id else {
        error!("ROOM_CLIENT_USER_ID is not set; refusing to guess an identity");
        std::process::exit(1);
    };

    info!("chat client starting as user {user_id}");
    let router = EventRouter::new(ChatStore::new(user_id));

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    tokio::spawn(socket::run_chat(
        config.ws_url.clone(),
        router,
        outbound_rx,
        update_tx,
    ));

    // stdin lines become chat sends; the socket loop applies the guard
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if outbound_tx.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(update) = update_rx.recv().await {
        match update {
            ViewUpdate::Roster(html) => println!("-- roster --\n{html}"),
            ViewUpdate::MessagePane(html) => println!("-- messages --\n{html}"),
            ViewUpdate::MessageAppend(html) => println!("{html}"),
            ViewUpdate::Notification { html, ttl } => {
                println!("{html}");
                info!("notification clears after {}s", ttl.as_secs());
            }
        }
    }
    info!("socket loop ended, exiting");
}
