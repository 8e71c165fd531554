//! Streaming batch build: one publication per run of same-subject statements.
//!
//! The build is a fold over [`BuildEvent`]s. The accumulator is an explicit
//! value; [`Accumulator::step`] consumes it and hands back the next one,
//! plus a publication whenever a subject change flushes the current run.
//!
//! ```text
//! Empty --stmt--> Accumulating(s) --stmt(s)--> Accumulating(s)
//!                 Accumulating(s) --stmt(t)--> [flush] Accumulating(t)
//!                 Accumulating(s) --ns------> Accumulating(-)
//!                 Accumulating(-) --stmt(t)--> Accumulating(t)
//!                 Accumulating(s) --end-----> ReadyToFinalize --> [flush]
//! ```

use chrono::{DateTime, Utc};

use crate::builder::{random_temp_uri, PublicationBuilder, TEMP_URI_BASE};
use crate::error::Result;
use crate::publication::{Namespace, Publication};
use crate::term::{Statement, Term};
use crate::vocab::{PROV_HAD_PRIMARY_SOURCE, PROV_WAS_DERIVED_FROM};

/// Input to the batch fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A namespace declaration. Applies to the current and all later
    /// publications, and lets the next statement join the current one.
    Namespace { prefix: String, iri: String },
    /// An assertion statement.
    Statement(Statement),
}

/// Batch build settings.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Base under which provisional URIs are minted.
    pub temp_uri_base: String,
    /// Source every publication is derived from.
    pub derived_from: Option<String>,
    /// Creators; empty means each publication credits `<uri>creator`.
    pub creators: Vec<String>,
    /// Fixed creation time; `None` stamps the time of finalization.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            temp_uri_base: TEMP_URI_BASE.to_string(),
            derived_from: None,
            creators: Vec::new(),
            timestamp: None,
        }
    }
}

/// Where the fold currently is.
#[derive(Debug, Clone)]
pub enum BatchState {
    /// No statements since the last flush.
    Empty,
    /// Collecting statements. `subject` is that of the last statement, or
    /// `None` after a namespace declaration.
    Accumulating {
        subject: Option<Term>,
        builder: PublicationBuilder,
    },
    /// Input ended; the builder is complete.
    ReadyToFinalize(PublicationBuilder),
}

/// The value threaded through the fold.
#[derive(Debug, Clone)]
pub struct Accumulator {
    config: BatchConfig,
    namespaces: Vec<Namespace>,
    state: BatchState,
}

impl Accumulator {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            namespaces: Vec::new(),
            state: BatchState::Empty,
        }
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    /// Advance by one event, flushing a publication on subject change.
    pub fn step(self, event: BuildEvent) -> Result<(Self, Option<Publication>)> {
        let Self {
            config,
            mut namespaces,
            state,
        } = self;

        match event {
            BuildEvent::Namespace { prefix, iri } => {
                namespaces.retain(|(p, _)| *p != prefix);
                namespaces.push((prefix.clone(), iri.clone()));
                let state = match state {
                    BatchState::Accumulating { builder, .. } => BatchState::Accumulating {
                        subject: None,
                        builder: builder.add_namespace(prefix, iri),
                    },
                    other => other,
                };
                Ok((Self { config, namespaces, state }, None))
            }
            BuildEvent::Statement(st) => {
                let (flushed, builder) = match state {
                    BatchState::Accumulating { subject, builder }
                        if subject.as_ref().map_or(true, |s| *s == st.subject) =>
                    {
                        (None, builder)
                    }
                    BatchState::Accumulating { builder, .. } | BatchState::ReadyToFinalize(builder) => {
                        let publication = finalize_with(&config, builder)?;
                        (Some(publication), start(&config, &namespaces))
                    }
                    BatchState::Empty => (None, start(&config, &namespaces)),
                };
                let state = BatchState::Accumulating {
                    subject: Some(st.subject.clone()),
                    builder: builder.add_assertion_statement(st),
                };
                Ok((Self { config, namespaces, state }, flushed))
            }
        }
    }

    /// Mark the end of input.
    pub fn end(self) -> Self {
        let state = match self.state {
            BatchState::Accumulating { builder, .. } => BatchState::ReadyToFinalize(builder),
            other => other,
        };
        Self { state, ..self }
    }

    /// End the input and flush whatever is pending.
    pub fn finish(self) -> Result<Option<Publication>> {
        let acc = self.end();
        match acc.state {
            BatchState::ReadyToFinalize(builder) => finalize_with(&acc.config, builder).map(Some),
            _ => Ok(None),
        }
    }
}

/// Run the whole fold over `events`.
pub fn build_all(
    config: BatchConfig,
    events: impl IntoIterator<Item = BuildEvent>,
) -> Result<Vec<Publication>> {
    let (acc, mut publications) = events.into_iter().try_fold(
        (Accumulator::new(config), Vec::new()),
        |(acc, mut out), event| {
            let (acc, flushed) = acc.step(event)?;
            out.extend(flushed);
            Ok::<_, crate::error::CoreError>((acc, out))
        },
    )?;
    publications.extend(acc.finish()?);
    Ok(publications)
}

fn start(config: &BatchConfig, namespaces: &[Namespace]) -> PublicationBuilder {
    let uri = random_temp_uri(&config.temp_uri_base);
    let assertion_uri = format!("{}assertion", uri);
    let creators = if config.creators.is_empty() {
        vec![format!("{}creator", uri)]
    } else {
        config.creators.clone()
    };

    let mut builder = PublicationBuilder::new(uri)
        .assertion_uri(assertion_uri)
        .add_default_namespaces();
    for (prefix, iri) in namespaces {
        builder = builder.add_namespace(prefix.clone(), iri.clone());
    }

    builder = match &config.derived_from {
        Some(source) => builder.add_provenance(Term::iri(PROV_WAS_DERIVED_FROM), Term::iri(source.clone())),
        None => creators.iter().fold(builder, |b, c| {
            b.add_provenance(Term::iri(PROV_HAD_PRIMARY_SOURCE), Term::iri(c.clone()))
        }),
    };
    creators.into_iter().fold(builder, |b, c| b.add_creator(c))
}

fn finalize_with(config: &BatchConfig, builder: PublicationBuilder) -> Result<Publication> {
    builder
        .add_timestamp(config.timestamp.unwrap_or_else(Utc::now))
        .remove_unused_prefixes(true)
        .finalize()
}
