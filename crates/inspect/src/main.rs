//! xonline Inspect - offline tooling for the online marshalling layer.
//!
//! Generates and classifies session ids, and turns backend JSON documents
//! into the fixed guest-memory images the console would receive.

use std::io::Read;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xonline_domain::ids::{SessionTag, Xuid};
use xonline_domain::wire::WireStruct;
use xonline_domain::{OnlineContext, OnlineSettings, PresenceRecord, SessionId};
use xonline_shared::{
    FriendsCollection, JsonObject, PresenceCollection, SessionObject, UserResolution,
};

const USAGE: &str = "Usage: xonline-inspect <command>

Commands:
  settings                     Show the effective online settings
  session-id [online|system-link|server]
                               Generate a session id (default: per network mode)
  classify <hex>               Classify a 64-bit session id
  presence <xuid> <text>       Presence publish document and X_ONLINE_PRESENCE image
  resolve <file|->             Decode a user lookup response into FIND_USERS_RESPONSE
  friends <file|->             Decode a friends presence response into X_ONLINE_FRIEND images
  session <file|->             Decode a session document into XSESSION_LOCAL_DETAILS";

/// Guest address the dumped lookup response is laid out at
const DUMP_BASE_ADDRESS: u32 = 0;

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "xonline_inspect=info,xonline_shared=info,xonline_domain=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = OnlineSettings::from_env().context("loading online settings")?;
    let context = OnlineContext::new(settings);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("settings") => show_settings(&context),
        Some("session-id") => generate_session_id(&context, args.next().as_deref()),
        Some("classify") => classify(&required(args.next(), "hex session id")?),
        Some("presence") => {
            let xuid = required(args.next(), "xuid")?;
            let text = args.collect::<Vec<_>>().join(" ");
            presence(&xuid, &text)
        }
        Some("resolve") => resolve(&read_document(&required(args.next(), "file")?)?),
        Some("friends") => friends(&read_document(&required(args.next(), "file")?)?),
        Some("session") => session(&read_document(&required(args.next(), "file")?)?),
        Some(cmd) => anyhow::bail!("Unknown command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!("{USAGE}"),
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn required(arg: Option<String>, what: &str) -> anyhow::Result<String> {
    arg.with_context(|| format!("missing argument: {what}\n\n{USAGE}"))
}

fn read_document(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("reading {source}"))
}

fn parse_tag(name: &str) -> anyhow::Result<SessionTag> {
    match name.to_ascii_lowercase().as_str() {
        "online" => Ok(SessionTag::Online),
        "system-link" | "system_link" | "systemlink" => Ok(SessionTag::SystemLink),
        "server" => Ok(SessionTag::Server),
        _ => anyhow::bail!("Unknown session tag: {name}"),
    }
}

/// Hex dump in 16-byte rows prefixed with the offset.
fn dump(label: &str, bytes: &[u8]) {
    println!("{label} ({:#X} bytes)", bytes.len());
    for (row, chunk) in bytes.chunks(16).enumerate() {
        println!("  {:04X}: {}", row * 16, hex::encode_upper(chunk));
    }
}

fn show_settings(context: &OnlineContext) -> anyhow::Result<()> {
    let settings = context.settings();
    println!("api_address:  {}", settings.api_address);
    println!("network_mode: {}", settings.network_mode);
    println!("uses_backend: {}", settings.network_mode.uses_backend());
    Ok(())
}

fn generate_session_id(context: &OnlineContext, tag: Option<&str>) -> anyhow::Result<()> {
    let id = match tag {
        Some(name) => SessionId::generate(parse_tag(name)?),
        None => context.generate_session_id(),
    };
    tracing::debug!(%id, kind = ?id.classify(), "generated session id");
    println!("{id}");
    Ok(())
}

fn classify(text: &str) -> anyhow::Result<()> {
    let id: SessionId = text.parse()?;
    println!("{id} {:?}", id.classify());
    Ok(())
}

fn presence(xuid: &str, text: &str) -> anyhow::Result<()> {
    let xuid: Xuid = xuid.parse()?;
    let mut record = PresenceRecord::new(xuid);
    let fit = record.set_rich_presence(text);
    if fit.is_truncated() {
        tracing::warn!(?fit, "rich presence truncated to the internal cap");
    }

    let collection: PresenceCollection = [record.clone()].into_iter().collect();
    println!("{}", collection.serialize()?);
    dump("X_ONLINE_PRESENCE", &record.to_wire_presence().to_bytes());
    Ok(())
}

fn resolve(document: &str) -> anyhow::Result<()> {
    let mut resolution = UserResolution::default();
    resolution
        .deserialize(document)
        .context("decoding user lookup response")?;

    for entry in resolution.response().entries() {
        let xuid = entry.xuid.map(|x| x.to_string()).unwrap_or_default();
        let gamertag = entry.gamertag.as_ref().map(|g| g.as_str()).unwrap_or("");
        println!("{xuid:>16} {gamertag}");
    }
    let image = resolution
        .response()
        .to_find_users_response(DUMP_BASE_ADDRESS)
        .to_bytes();
    dump("FIND_USERS_RESPONSE", &image);
    Ok(())
}

fn friends(document: &str) -> anyhow::Result<()> {
    let mut friends = FriendsCollection::new();
    friends
        .deserialize(document)
        .context("decoding friends presence response")?;

    for (friend, image) in friends.friends().iter().zip(friends.to_wire_friends()) {
        dump(
            &format!("X_ONLINE_FRIEND {} {}", friend.xuid(), friend.gamertag()),
            &image.to_bytes(),
        );
    }
    Ok(())
}

fn session(document: &str) -> anyhow::Result<()> {
    let mut object = SessionObject::default();
    object
        .deserialize(document)
        .context("decoding session document")?;

    let record = object.record();
    println!("{} {:?} {}", record.id(), record.id().classify(), record.state());
    dump(
        "XSESSION_LOCAL_DETAILS",
        &record.to_local_details(0).to_bytes(),
    );
    Ok(())
}
