//! Statistics commands: `summary`, `padd`.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use pihole_api::{Error, PiholeClient, SensorKey, SummaryStats};

use crate::cli::{GlobalOpts, OutputFormat, PaddArgs};
use crate::output;

#[derive(Serialize)]
struct SensorReading {
    key: SensorKey,
    label: &'static str,
    value: String,
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    label: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn readings(stats: &SummaryStats) -> Vec<SensorReading> {
    SensorKey::iter()
        .map(|key| SensorReading {
            key,
            label: key.label(),
            value: stats.value(key).to_string(),
        })
        .collect()
}

pub async fn summary(client: &PiholeClient, global: &GlobalOpts) -> Result<(), Error> {
    let resp = client.summary().await?;

    let out = match global.output {
        // Structured formats get the whole body, not just the sensors.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_single(&global.output, &resp.data, |_| String::new(), |_| String::new())
        }
        OutputFormat::Table | OutputFormat::Plain => {
            let stats = client.summary_stats()?;
            output::render_list(
                &global.output,
                &readings(&stats),
                |r| SensorRow {
                    label: r.label,
                    value: r.value.clone(),
                },
                |r| format!("{}\t{}", r.key, r.value),
            )
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn padd(client: &PiholeClient, args: &PaddArgs, global: &GlobalOpts) -> Result<(), Error> {
    let resp = client.padd(!args.partial).await?;

    let out = output::render_single(
        &global.output,
        &resp.data,
        |data| output::render_json_pretty(data),
        |data| output::render_json_pretty(data),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
