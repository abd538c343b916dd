//
//  bitbucket-pullrequests
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::load_config;
use super::GlobalOptions;
use crate::api::cloud::pullrequests::{decode_pull_request, PullRequest};
use crate::api::cloud::{PullRequestClient, PullRequestsOptions};
use crate::api::BitbucketClient;
use crate::config::is_cloud_api;
use crate::output::{
    format_state, print_field, print_header, OutputWriter, TableBuilder, TableOutput,
};
use crate::util::{format_relative_time, page_output, truncate};

/// Pull request commands
#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a pull request
    View(IdArgs),

    /// Create a pull request
    Create(CreateArgs),

    /// Update the title, description, destination or reviewers of a pull request
    #[command(visible_alias = "edit")]
    Update(UpdateArgs),

    /// Merge a pull request
    Merge(MergeArgs),

    /// Decline a pull request
    Decline(DeclineArgs),

    /// Show the diff of a pull request
    Diff(IdArgs),

    /// Show the patch series of a pull request
    Patch(IdArgs),

    /// List the commits of a pull request
    Commits(IdArgs),

    /// Show activity for one pull request, or for the whole repository
    Activity(ActivityArgs),

    /// List comments, or show a single comment
    Comments(CommentsArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by state
    #[arg(long, short = 's', value_parser = ["open", "merged", "declined", "superseded"])]
    pub state: Option<String>,

    /// Bitbucket query, e.g. 'author.nickname="jane"'
    #[arg(long, short = 'q')]
    pub query: Option<String>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Pull request ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the pull request
    #[arg(long, short = 't')]
    pub title: String,

    /// Description (Markdown)
    #[arg(long, short = 'b')]
    pub description: Option<String>,

    /// Source branch
    #[arg(long, short = 's')]
    pub source: String,

    /// Destination branch (repository main branch when omitted)
    #[arg(long, short = 'd')]
    pub destination: Option<String>,

    /// Fork holding the source branch, as workspace/repo
    #[arg(long)]
    pub source_repo: Option<String>,

    /// Destination commit hash
    #[arg(long)]
    pub destination_commit: Option<String>,

    /// Reviewer username (repeatable)
    #[arg(long = "reviewer", short = 'r')]
    pub reviewers: Vec<String>,

    /// Delete the source branch after merge
    #[arg(long)]
    pub close_source_branch: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Pull request ID
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'b')]
    pub description: Option<String>,

    /// New destination branch
    #[arg(long, short = 'd')]
    pub destination: Option<String>,

    /// Replace reviewers (repeatable). Existing reviewers are kept when omitted;
    /// required if any current reviewer has no username.
    #[arg(long = "reviewer", short = 'r')]
    pub reviewers: Vec<String>,

    /// Whether to delete the source branch after merge
    #[arg(long)]
    pub close_source_branch: Option<bool>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Pull request ID
    pub id: u64,

    /// Merge commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Delete the source branch after merge
    #[arg(long)]
    pub close_source_branch: bool,
}

#[derive(Args, Debug)]
pub struct DeclineArgs {
    /// Pull request ID
    pub id: u64,

    /// Reason for declining
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Pull request ID; repository-wide activity when omitted
    pub id: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    /// Pull request ID
    pub id: u64,

    /// Show only this comment
    #[arg(long)]
    pub comment: Option<u64>,
}

/// Everything a pull request command needs once flags and config are merged.
struct PrContext {
    client: BitbucketClient,
    owner: String,
    repo: String,
    output: OutputWriter,
}

impl PrContext {
    fn resolve(global: &GlobalOptions) -> Result<Self> {
        let config = load_config(global)?;

        let owner = global
            .owner
            .clone()
            .or_else(|| config.defaults.owner.clone())
            .context("No repository owner given; pass --owner or set defaults.owner")?;
        let repo = global
            .repo
            .clone()
            .or_else(|| config.defaults.repo.clone())
            .context("No repository given; pass --repo or set defaults.repo")?;

        let mut client = BitbucketClient::from_config(&config.api)?;
        match config.credential() {
            Some(credential) => {
                debug!(kind = credential.kind(), "using configured credentials");
                client = client.with_auth(credential);
            }
            None if is_cloud_api(client.base_url()) => {
                warn!("no credentials configured; only public repositories are reachable");
            }
            None => {}
        }

        debug!(%owner, %repo, base_url = client.base_url(), "resolved repository");

        Ok(Self {
            client,
            owner,
            repo,
            output: OutputWriter::from_flag(global.json),
        })
    }

    fn options(&self) -> PullRequestsOptions {
        PullRequestsOptions::new(&self.owner, &self.repo)
    }

    fn pull_requests(&self) -> PullRequestClient<'_, BitbucketClient> {
        self.client.pull_requests()
    }
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let ctx = PrContext::resolve(global)?;

        match self {
            Self::List(args) => Self::list(&ctx, args).await,
            Self::View(args) => Self::view(&ctx, args).await,
            Self::Create(args) => Self::create(&ctx, args).await,
            Self::Update(args) => Self::update(&ctx, args).await,
            Self::Merge(args) => Self::merge(&ctx, args).await,
            Self::Decline(args) => Self::decline(&ctx, args).await,
            Self::Diff(args) => Self::diff(&ctx, args, false).await,
            Self::Patch(args) => Self::diff(&ctx, args, true).await,
            Self::Commits(args) => Self::commits(&ctx, args).await,
            Self::Activity(args) => Self::activity(&ctx, args).await,
            Self::Comments(args) => Self::comments(&ctx, args).await,
        }
    }

    async fn list(ctx: &PrContext, args: &ListArgs) -> Result<()> {
        let options = ctx.options();
        let prs = match build_query(args.state.as_deref(), args.query.as_deref()) {
            Some(query) => ctx.pull_requests().list_with_query(&options, &query).await?,
            None => ctx.pull_requests().list(&options).await?,
        };

        ctx.output.write(prs.as_slice())
    }

    async fn view(ctx: &PrContext, args: &IdArgs) -> Result<()> {
        let options = ctx.options().with_id(args.id);

        if ctx.output.is_json() {
            let raw = ctx.pull_requests().get(&options).await?;
            return ctx.output.write_json(&raw);
        }

        let pr = ctx.pull_requests().get_pull_request(&options).await?;
        ctx.output.write(&pr)
    }

    async fn create(ctx: &PrContext, args: &CreateArgs) -> Result<()> {
        let options = PullRequestsOptions {
            title: args.title.clone(),
            description: args.description.clone().unwrap_or_default(),
            source_branch: args.source.clone(),
            source_repository: args.source_repo.clone().unwrap_or_default(),
            destination_branch: args.destination.clone().unwrap_or_default(),
            destination_commit: args.destination_commit.clone().unwrap_or_default(),
            close_source_branch: args.close_source_branch,
            reviewers: args.reviewers.clone(),
            ..ctx.options()
        };

        let pr = ctx
            .pull_requests()
            .create(&options)
            .await
            .context("Failed to create pull request")?;

        if ctx.output.is_json() {
            return ctx.output.write_json(&pr);
        }

        ctx.output
            .write_success(&format!("Created pull request #{}: {}", pr.id, pr.title));
        if let Some(url) = pr.html_url() {
            println!("{}", url);
        }
        Ok(())
    }

    async fn update(ctx: &PrContext, args: &UpdateArgs) -> Result<()> {
        let target = ctx.options().with_id(args.id);

        // The update body replaces every field, so unset flags keep current values.
        let current = ctx.pull_requests().get_pull_request(&target).await?;
        let options = merge_update(target, &current, args)?;

        let response = ctx.pull_requests().update(&options).await?;
        if ctx.output.is_json() {
            return ctx.output.write_json(&response);
        }

        let pr = decode_pull_request(response)?;
        ctx.output
            .write_success(&format!("Updated pull request #{}: {}", pr.id, pr.title));
        Ok(())
    }

    async fn merge(ctx: &PrContext, args: &MergeArgs) -> Result<()> {
        let options = PullRequestsOptions {
            message: args.message.clone().unwrap_or_default(),
            close_source_branch: args.close_source_branch,
            ..ctx.options().with_id(args.id)
        };

        let response = ctx.pull_requests().merge(&options).await?;
        Self::report_transition(ctx, response, "Merged")
    }

    async fn decline(ctx: &PrContext, args: &DeclineArgs) -> Result<()> {
        let options = PullRequestsOptions {
            message: args.message.clone().unwrap_or_default(),
            ..ctx.options().with_id(args.id)
        };

        let response = ctx.pull_requests().decline(&options).await?;
        Self::report_transition(ctx, response, "Declined")
    }

    fn report_transition(ctx: &PrContext, response: Value, verb: &str) -> Result<()> {
        if ctx.output.is_json() {
            return ctx.output.write_json(&response);
        }

        let pr = decode_pull_request(response)?;
        ctx.output.write_success(&format!(
            "{} pull request #{} ({})",
            verb,
            pr.id,
            format_state(pr.state, ctx.output.color_enabled())
        ));
        Ok(())
    }

    async fn diff(ctx: &PrContext, args: &IdArgs, patch: bool) -> Result<()> {
        let options = ctx.options().with_id(args.id);
        let text = if patch {
            ctx.pull_requests().patch_text(&options).await?
        } else {
            ctx.pull_requests().diff_text(&options).await?
        };

        page_output(&text)
    }

    async fn commits(ctx: &PrContext, args: &IdArgs) -> Result<()> {
        let response = ctx
            .pull_requests()
            .commits(&ctx.options().with_id(args.id))
            .await?;

        if ctx.output.is_json() {
            return ctx.output.write_json(&response);
        }

        let mut table = TableBuilder::new()
            .color(ctx.output.color_enabled())
            .headers(["HASH", "AUTHOR", "MESSAGE"]);
        for commit in page_values(&response) {
            let message = str_at(commit, &["message"]);
            table = table.row([
                truncate(str_at(commit, &["hash"]), 12),
                commit_author(commit).to_string(),
                truncate(message.lines().next().unwrap_or(""), 72),
            ]);
        }
        table.print();
        Ok(())
    }

    async fn activity(ctx: &PrContext, args: &ActivityArgs) -> Result<()> {
        let response = match args.id {
            Some(id) => {
                ctx.pull_requests()
                    .activity(&ctx.options().with_id(id))
                    .await?
            }
            None => ctx.pull_requests().activities(&ctx.options()).await?,
        };

        ctx.output.write_json(&response)
    }

    async fn comments(ctx: &PrContext, args: &CommentsArgs) -> Result<()> {
        let options = ctx.options().with_id(args.id);
        let response = match args.comment {
            Some(comment_id) => {
                ctx.pull_requests()
                    .comment(&options.with_comment_id(comment_id))
                    .await?
            }
            None => ctx.pull_requests().comments(&options).await?,
        };

        if ctx.output.is_json() {
            return ctx.output.write_json(&response);
        }

        let color = ctx.output.color_enabled();
        let comments: Vec<&Value> = match args.comment {
            Some(_) => vec![&response],
            None => page_values(&response).collect(),
        };
        if comments.is_empty() {
            println!("No comments");
        }
        for comment in comments {
            let author = str_at(comment, &["user", "display_name"]);
            let when = str_at(comment, &["created_on"]);
            print_field(author, when, color);
            println!("{}\n", str_at(comment, &["content", "raw"]));
        }
        Ok(())
    }
}

/// Combines the state filter and a free-form query into one Bitbucket query.
fn build_query(state: Option<&str>, query: Option<&str>) -> Option<String> {
    let state = state.map(|s| format!("state=\"{}\"", s.to_uppercase()));
    match (state, query) {
        (None, None) => None,
        (Some(state), None) => Some(state),
        (None, Some(query)) => Some(query.to_string()),
        (Some(state), Some(query)) => Some(format!("{} AND ({})", state, query)),
    }
}

/// Fills the fields the user did not pass from the current pull request.
///
/// Reviewers can only be sent back by username, so an update without
/// `--reviewer` is refused when a current reviewer has none.
fn merge_update(
    target: PullRequestsOptions,
    current: &PullRequest,
    args: &UpdateArgs,
) -> Result<PullRequestsOptions> {
    let reviewers = if args.reviewers.is_empty() {
        let unnamed: Vec<&str> = current
            .reviewers
            .iter()
            .filter(|r| r.username.is_empty())
            .map(|r| r.handle())
            .collect();
        if !unnamed.is_empty() {
            bail!(
                "Reviewers without a username would be removed ({}); pass --reviewer for every reviewer to keep",
                unnamed.join(", ")
            );
        }
        current.reviewers.iter().map(|r| r.username.clone()).collect()
    } else {
        args.reviewers.clone()
    };

    Ok(PullRequestsOptions {
        title: args.title.clone().unwrap_or_else(|| current.title.clone()),
        description: args
            .description
            .clone()
            .unwrap_or_else(|| current.description.clone()),
        destination_branch: args
            .destination
            .clone()
            .unwrap_or_else(|| current.destination.branch.name.clone()),
        close_source_branch: args
            .close_source_branch
            .unwrap_or(current.close_source_branch),
        reviewers,
        ..target
    })
}

fn page_values(value: &Value) -> impl Iterator<Item = &Value> {
    value
        .get("values")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> &'a str {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn commit_author(commit: &Value) -> &str {
    match str_at(commit, &["author", "user", "display_name"]) {
        "" => str_at(commit, &["author", "raw"]),
        name => name,
    }
}

impl TableOutput for PullRequest {
    fn print_table(&self, color: bool) {
        print_header(&format!("#{} {}", self.id, self.title));
        print_field("State", &format_state(self.state, color), color);
        print_field("Author", self.author.handle(), color);
        print_field(
            "Branches",
            &format!(
                "{} -> {}",
                self.source.branch.name, self.destination.branch.name
            ),
            color,
        );

        if !self.reviewers.is_empty() {
            let names: Vec<&str> = self.reviewers.iter().map(|r| r.handle()).collect();
            print_field("Reviewers", &names.join(", "), color);
        }
        print_field("Approvals", &self.approval_count().to_string(), color);
        print_field(
            "Comments",
            &format!("{} ({} tasks)", self.comment_count, self.task_count),
            color,
        );

        let created = self
            .created_at()
            .map(|t| format_relative_time(&t))
            .unwrap_or_else(|| self.created_on.clone());
        print_field("Created", &created, color);

        if let Some(url) = self.html_url() {
            print_field("URL", url, color);
        }

        if !self.description.is_empty() {
            println!();
            println!("{}", self.description);
        }
    }
}

impl TableOutput for [PullRequest] {
    fn print_table(&self, color: bool) {
        if self.is_empty() {
            println!("No pull requests found");
            return;
        }

        let mut table = TableBuilder::new()
            .color(color)
            .headers(["ID", "TITLE", "AUTHOR", "BRANCH", "STATE", "UPDATED"]);

        for pr in self {
            let updated = pr
                .updated_at()
                .map(|t| format_relative_time(&t))
                .unwrap_or_default();
            table = table.row([
                format!("#{}", pr.id),
                truncate(&pr.title, 50),
                pr.author.handle().to_string(),
                format!("{} -> {}", pr.source.branch.name, pr.destination.branch.name),
                format_state(pr.state, color),
                updated,
            ]);
        }

        table.print();
    }
}
