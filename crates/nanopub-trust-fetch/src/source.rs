//! Candidate server sources.
//!
//! Ordering and refresh policy belong to the caller. The retriever pulls
//! candidates one at a time and never reorders them.

/// A lazy, possibly infinite sequence of server base URLs.
///
/// `None` means there are no more candidates.
pub trait CandidateServerSource: Send {
    fn next_candidate(&mut self) -> Option<String>;
}

impl<I> CandidateServerSource for I
where
    I: Iterator<Item = String> + Send,
{
    fn next_candidate(&mut self) -> Option<String> {
        self.next()
    }
}

/// Public servers tried when no other list is given.
pub const BOOTSTRAP_SERVERS: &[&str] = &[
    "http://np.inn.ac/",
    "http://nanopubs.semanticscience.org/",
    "http://nanopubs.stanford.edu/nanopub-server/",
    "http://nanopub-server.ops.labs.vu.nl/",
    "http://server.nanopubs.lod.labs.vu.nl/",
];

/// A fixed list of servers, visited once in order.
#[derive(Debug, Clone)]
pub struct ServerList {
    servers: Vec<String>,
    position: usize,
}

impl ServerList {
    /// Servers are normalized to end with `/` so codes can be appended.
    pub fn new(servers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let servers = servers
            .into_iter()
            .map(Into::into)
            .map(|s: String| if s.ends_with('/') { s } else { format!("{}/", s) })
            .collect();
        Self { servers, position: 0 }
    }

    /// Candidates not yet handed out.
    pub fn remaining(&self) -> &[String] {
        &self.servers[self.position..]
    }
}

impl Default for ServerList {
    fn default() -> Self {
        Self::new(BOOTSTRAP_SERVERS.iter().copied())
    }
}

impl Iterator for ServerList {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let server = self.servers.get(self.position).cloned()?;
        self.position += 1;
        Some(server)
    }
}
