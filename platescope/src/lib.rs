//! Shared plumbing for the platescope command-line tools.

use log::LevelFilter;
use session::Session;
use std::error::Error;

/// Default warn, `-v` info, `-d` debug.
pub fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::builder()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(level)
        .init();
}

/// Opens and authenticates the one session a tool run uses. A username
/// without a session key prompts interactively for a password, which is
/// not echoed.
pub fn open_session(
    server: &str,
    port: Option<u16>,
    username: Option<&str>,
    session_key: Option<&str>,
) -> Result<Session, Box<dyn Error>> {
    let mut session = Session::connect(server, port)?;
    match (username, session_key) {
        (_, Some(key)) => session.join(key)?,
        (Some(username), None) => {
            let password = rpassword::prompt_password(format!("Password for {username}: "))?;
            session.login(username, &password)?;
        }
        (None, None) => {
            return Err("either --username or --session_key is required".into());
        }
    }
    Ok(session)
}
