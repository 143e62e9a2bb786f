use arnpager::arn::QualifiedNameFormat;
use arnpager::aws::{list_stack_ids, ListStacksRequest};
use arnpager::id::CompositeId;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation::Client;
use eyre::{Result, WrapErr};
use futures::future::join_all;
use structopt::StructOpt;
use termcolor::{ColorChoice, StandardStream, WriteColor};
use tokio::sync::watch;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

mod writer;

use crate::writer::Writer;

#[derive(StructOpt)]
#[structopt(about = "Decode composite resource ids and list them from AWS")]
enum Opts {
    /// Split a persisted `scope/name` id into its parts
    Decode { id: String },

    /// Extract the `scope/name` id from an ARN
    FromArn {
        arn: String,

        /// Service the ARN must belong to, e.g. `scheduler`
        #[structopt(long)]
        service: String,

        /// Resource type preceding the id, e.g. `schedule`
        #[structopt(long)]
        resource_type: String,
    },

    /// List the ids of CloudFormation stacks
    Stacks {
        /// Regions to list, concurrently; defaults to the configured region
        #[structopt(short, long)]
        region: Vec<String>,

        /// Only list stacks in these statuses, e.g. `CREATE_COMPLETE`
        #[structopt(short, long)]
        status: Vec<String>,
    },
}

async fn build_client(region: Option<String>) -> (String, Client) {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    let config = loader.load().await;

    let region = config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::debug!(region = %region, "chosen region");

    (region, Client::new(&config))
}

async fn list_stacks<W>(
    writer: &mut Writer<W>,
    regions: Vec<String>,
    status_filter: Vec<String>,
) -> Result<()>
where
    W: WriteColor,
{
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling listings");
            let _ = cancel_tx.send(true);
        }
    });

    let regions: Vec<Option<String>> = if regions.is_empty() {
        vec![None]
    } else {
        regions.into_iter().map(Some).collect()
    };

    let listings = regions.into_iter().map(|region| {
        let mut cancel = cancel_rx.clone();
        let request = ListStacksRequest {
            next_token: None,
            status_filter: status_filter.clone(),
        };
        let span = tracing::info_span!("list stacks", region = ?region);
        async move {
            let (region, client) = build_client(region).await;
            let ids = list_stack_ids(&client, request, &mut cancel).await;
            (region, ids)
        }
        .instrument(span)
    });

    for (region, ids) in join_all(listings).await {
        let ids = ids.wrap_err_with(|| format!("listing stacks in {}", region))?;
        for id in &ids {
            writer
                .write_stack(&region, id)
                .wrap_err("printing stack id")?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    color_eyre::install()?;

    let opts = Opts::from_args();

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut writer = Writer::new(stdout.lock());

    match opts {
        Opts::Decode { id } => {
            let id: CompositeId = id.parse().wrap_err("decoding id")?;
            writer.write_id(&id).wrap_err("printing id")?;
        }
        Opts::FromArn {
            arn,
            service,
            resource_type,
        } => {
            let format = QualifiedNameFormat::new(&service, &resource_type);
            let id = format.parse_id(&arn).wrap_err("extracting id from arn")?;
            writer.write_id(&id).wrap_err("printing id")?;
        }
        Opts::Stacks { region, status } => {
            tracing::info!(regions = ?region, status = ?status, "listing stacks");
            list_stacks(&mut writer, region, status).await?;
        }
    }

    writer.flush().wrap_err("flushing output")?;
    Ok(())
}
