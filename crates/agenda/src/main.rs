use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use clubhub_client::{local_offset, EventFeed, Notice, RequestBoard};
use clubhub_config::{config, configure};
use clubhub_database::DatabaseInfo;
use clubhub_models::v0::{CalendarView, FilterSpec, LocationType, RequestSort, TimeOfDay};
use clubhub_result::Result;

mod render;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show calendar events
    Events(EventsArgs),
    /// Show the event request board
    Board(BoardArgs),
}

#[derive(Args)]
struct EventsArgs {
    /// Calendar layout: list, week or month
    #[clap(long, default_value = "list")]
    view: CalendarView,
    /// Date the view is anchored on, defaults to today
    #[clap(long)]
    date: Option<NaiveDate>,
    #[clap(long = "tag")]
    tags: Vec<String>,
    #[clap(long = "major")]
    majors: Vec<String>,
    #[clap(long = "club")]
    clubs: Vec<String>,
    /// on_campus, off_campus, online or hybrid
    #[clap(long = "location")]
    locations: Vec<LocationType>,
    /// morning, afternoon or evening
    #[clap(long = "time")]
    times: Vec<TimeOfDay>,
    #[clap(long, default_value = "")]
    search: String,
    #[clap(long)]
    hide_cancelled: bool,
}

#[derive(Args)]
struct BoardArgs {
    /// most-upvoted, newest or fulfilled
    #[clap(long, default_value = "most-upvoted")]
    sort: RequestSort,
    #[clap(long = "major")]
    majors: Vec<String>,
    #[clap(long, default_value = "")]
    search: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    configure!();

    let cli = Cli::parse();
    let settings = config().await;
    let db = DatabaseInfo::Auto.connect().await.map_err(|error| {
        log::error!("{error}");
        clubhub_result::create_error!(InternalError)
    })?;

    let outcome = match cli.command {
        Command::Events(args) => {
            let feed = EventFeed::new(db, &settings.cache, &settings.calendar);
            let anchor = args
                .date
                .unwrap_or_else(|| Utc::now().with_timezone(feed.tz()).date_naive());

            let filter = FilterSpec {
                majors: args.majors.into_iter().collect(),
                tags: args.tags.into_iter().collect(),
                clubs: args.clubs.into_iter().collect(),
                location_types: args.locations.into_iter().collect(),
                time_of_day: args.times.into_iter().collect(),
                search: args.search,
                hide_cancelled: args.hide_cancelled,
            };

            let range = feed.range(args.view, anchor);
            let shown = feed.days(args.view, anchor, &filter).await;
            if shown.is_ok() {
                feed.prefetch(args.view, anchor, &filter).await;
            }

            shown.map(|days| render::days(&range, &days, &local_offset(&settings.calendar)))
        }
        Command::Board(args) => {
            let board = RequestBoard::new(db, &settings.cache);
            let filter = FilterSpec {
                majors: args.majors.into_iter().collect(),
                search: args.search,
                ..Default::default()
            };

            match (board.counts().await, board.view(&filter, args.sort).await) {
                (Ok(counts), Ok(requests)) => Ok(render::board(args.sort, &counts, &requests)),
                (Err(error), _) | (_, Err(error)) => Err(error),
            }
        }
    };

    match outcome {
        Ok(text) => {
            print!("{text}");
            Ok(())
        }
        Err(error) => {
            match Notice::from(&error) {
                Notice::Error { message, retry } => {
                    eprintln!("{message}");
                    if retry {
                        eprintln!("Run the command again to retry.");
                    }
                }
                Notice::SignInRequired => eprintln!("Sign in to continue."),
                Notice::Invalid { field, message } => eprintln!("{field}: {message}"),
            }

            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_parse_by_name() {
        let cli = Cli::try_parse_from([
            "agenda",
            "events",
            "--location",
            "online",
            "--location",
            "off_campus",
        ])
        .unwrap();

        let Command::Events(args) = cli.command else {
            panic!("expected the events command");
        };
        assert_eq!(args.locations, vec![LocationType::Online, LocationType::OffCampus]);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["agenda", "events", "--location", "moon"]).is_err());
        assert!(Cli::try_parse_from(["agenda", "board", "--hide-deleted"]).is_err());
    }
}
