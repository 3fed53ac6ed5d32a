//! Error types and result definitions for handoff pipelines.
//!
//! Provides a kind-based error system with captured callsite metadata for the
//! channel, barrier, and worker primitives. The [`HandoffError`] type supports
//! single errors, errors with additional detail, and multiple aggregated errors
//! for the case where several workers fail in the same run.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Convenient result type for handoff operations using [`HandoffError`] as the error type.
pub type HandoffResult<T> = Result<T, HandoffError>;

/// Detailed payload stored for single [`HandoffError`] instances.
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
}

/// Main error type for handoff operations.
///
/// [`HandoffError`] represents either a single failure or multiple aggregated
/// worker failures. Usage faults on the synchronization primitives (sending on
/// a closed channel, over-signaling a barrier) surface through this type and
/// are never silently swallowed.
#[derive(Debug, Clone)]
pub struct HandoffError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Single error payload holding the captured metadata.
    Single(ErrorPayload),
    /// Multiple aggregated errors.
    ///
    /// This variant is mainly useful to capture multiple worker failures.
    Many {
        errors: Vec<HandoffError>,
        location: &'static Location<'static>,
    },
}

/// Specific categories of errors that can occur in handoff pipelines.
///
/// The channel and barrier kinds are usage faults: programming errors in the
/// shutdown sequencing of an orchestrator, surfaced loudly instead of being
/// masked. The panic kinds classify workers that died abnormally.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Channel usage faults
    SendOnClosedChannel,
    ChannelAlreadyClosed,

    // Barrier usage faults
    BarrierNotConfigured,
    BarrierAlreadyConfigured,
    BarrierOverSignaled,

    // Worker failures
    ProducerPanic,
    ConsumerPanic,

    // IO errors, e.g. from the stdout sink
    IoError,

    // Unknown / Uncategorized
    Unknown,
}

impl HandoffError {
    /// Returns the [`ErrorKind`] of this error.
    ///
    /// For multiple errors, returns the kind of the first error or
    /// [`ErrorKind::Unknown`] if the error list is empty.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.kind,
            ErrorRepr::Many { ref errors, .. } => errors
                .first()
                .map(|err| err.kind())
                .unwrap_or(ErrorKind::Unknown),
        }
    }

    /// Returns all [`ErrorKind`]s present in this error.
    ///
    /// For single errors, returns a vector with one element. For multiple
    /// errors, returns a flattened vector of all error kinds.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self.repr {
            ErrorRepr::Single(ref payload) => vec![payload.kind],
            ErrorRepr::Many { ref errors, .. } => errors
                .iter()
                .flat_map(|err| err.kinds())
                .collect::<Vec<_>>(),
        }
    }

    /// Returns the detailed error information if available.
    ///
    /// For multiple errors, returns the detail of the first error that has one.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.detail.as_deref(),
            ErrorRepr::Many { ref errors, .. } => errors.iter().find_map(|e| e.detail()),
        }
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.location,
            ErrorRepr::Many { location, .. } => location,
        }
    }

    /// Attaches an originating [`error::Error`] to this error and returns the
    /// modified instance.
    ///
    /// Has no effect when called on aggregated errors because aggregates
    /// forward the first contained error as their source.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        if let ErrorRepr::Single(ref mut payload) = self.repr {
            payload.source = Some(Arc::new(source));
        }
        self
    }

    /// Creates a [`HandoffError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        HandoffError {
            repr: ErrorRepr::Single(ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
            }),
        }
    }
}

impl PartialEq for HandoffError {
    fn eq(&self, other: &HandoffError) -> bool {
        match (&self.repr, &other.repr) {
            (ErrorRepr::Single(a), ErrorRepr::Single(b)) => a.kind == b.kind,
            (
                ErrorRepr::Many {
                    errors: errors_a, ..
                },
                ErrorRepr::Many {
                    errors: errors_b, ..
                },
            ) => {
                errors_a.len() == errors_b.len()
                    && errors_a.iter().zip(errors_b.iter()).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match &self.repr {
            ErrorRepr::Single(payload) => {
                let location = payload.location;
                write!(
                    f,
                    "[{:?}] {} @ {}:{}:{}",
                    payload.kind,
                    payload.description,
                    location.file(),
                    location.line(),
                    location.column()
                )?;

                if let Some(detail) = payload.detail.as_deref() {
                    write!(f, "\n  Detail: {detail}")?;
                }

                Ok(())
            }
            ErrorRepr::Many { errors, location } => {
                let count = errors.len();
                write!(
                    f,
                    "[Many] {} error{} aggregated @ {}:{}:{}",
                    count,
                    if count == 1 { "" } else { "s" },
                    location.file(),
                    location.line(),
                    location.column()
                )?;

                for (index, error) in errors.iter().enumerate() {
                    let rendered = format!("{error}");
                    for (line_index, line) in rendered.lines().enumerate() {
                        if line_index == 0 {
                            write!(f, "\n  {}. {}", index + 1, line)?;
                        } else {
                            write!(f, "\n     {line}")?;
                        }
                    }
                }

                Ok(())
            }
        }
    }
}

impl error::Error for HandoffError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.repr {
            ErrorRepr::Single(payload) => payload
                .source
                .as_ref()
                .map(|source| source as &(dyn error::Error + 'static)),
            // For aggregated errors, we forward the first contained error as the source.
            ErrorRepr::Many { errors, .. } => errors
                .first()
                .map(|error| error as &(dyn error::Error + 'static)),
        }
    }
}

/// Creates a [`HandoffError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for HandoffError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> HandoffError {
        HandoffError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`HandoffError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for HandoffError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> HandoffError {
        HandoffError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Creates a [`HandoffError`] from a vector of errors for aggregation.
///
/// If the vector contains exactly one error, returns that error directly
/// without wrapping it in an aggregate.
impl<E> From<Vec<E>> for HandoffError
where
    E: Into<HandoffError>,
{
    #[track_caller]
    fn from(errors: Vec<E>) -> HandoffError {
        let location = Location::caller();

        let mut errors: Vec<HandoffError> = errors.into_iter().map(Into::into).collect();

        if errors.len() == 1 {
            return errors.pop().expect("just checked length is 1");
        }

        HandoffError {
            repr: ErrorRepr::Many { errors, location },
        }
    }
}

/// Converts [`std::io::Error`] to [`HandoffError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for HandoffError {
    #[track_caller]
    fn from(err: std::io::Error) -> HandoffError {
        let detail = err.to_string();
        let source = Arc::new(err);
        HandoffError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(source),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error_exposes_kind_and_detail() {
        let err = HandoffError::from((
            ErrorKind::SendOnClosedChannel,
            "Send on closed channel",
            "channel was closed by the orchestrator",
        ));

        assert_eq!(err.kind(), ErrorKind::SendOnClosedChannel);
        assert_eq!(
            err.detail(),
            Some("channel was closed by the orchestrator")
        );
    }

    #[test]
    fn test_aggregation_collapses_singletons() {
        let inner = HandoffError::from((ErrorKind::BarrierOverSignaled, "Over-signaled"));
        let aggregated: HandoffError = vec![inner].into();

        assert_eq!(aggregated.kind(), ErrorKind::BarrierOverSignaled);
        assert_eq!(aggregated.kinds().len(), 1);
    }

    #[test]
    fn test_aggregation_preserves_all_kinds() {
        let errors = vec![
            HandoffError::from((ErrorKind::ProducerPanic, "Producer worker panicked")),
            HandoffError::from((ErrorKind::ConsumerPanic, "Consumer worker panicked")),
        ];
        let aggregated: HandoffError = errors.into();

        assert_eq!(aggregated.kind(), ErrorKind::ProducerPanic);
        assert_eq!(
            aggregated.kinds(),
            vec![ErrorKind::ProducerPanic, ErrorKind::ConsumerPanic]
        );
    }
}
