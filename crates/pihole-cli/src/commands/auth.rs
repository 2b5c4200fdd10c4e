//! Session commands: `status`, `logout`.

use pihole_api::models::AuthResponse;
use pihole_api::{Error, PiholeClient};

use crate::cli::GlobalOpts;
use crate::output;

pub async fn status(client: &PiholeClient, global: &GlobalOpts) -> Result<(), Error> {
    let resp = client.authentication_status().await?;
    let auth: AuthResponse = resp.decode()?;
    let session = auth.session;

    let redacted = pihole_api::redact_session(&resp.data);
    let out = output::render_single(
        &global.output,
        &redacted,
        |_| {
            let validity = match session.validity {
                Some(secs) if secs >= 0 => format!("{secs}s"),
                _ => "unlimited".into(),
            };
            format!(
                "Session:   {}\nTOTP:      {}\nValidity:  {validity}",
                if session.valid { "valid" } else { "invalid" },
                if session.totp { "required" } else { "not required" },
            )
        },
        |_| session.valid.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn logout(client: &PiholeClient, global: &GlobalOpts) -> Result<(), Error> {
    client.logout().await?;
    output::print_output("Logged out", global.quiet);
    Ok(())
}
