//! The converter facade.

use serde::Serialize;

use crate::adapter::{ConsumptionState, ConsumptionTracker, ElementCursor};
use crate::config::ConverterConfig;
use crate::error::wraps_already_consumed;
use crate::json::{JsonTokenReader, JsonWriter};
use crate::registry::{CapabilityResolver, SequenceCapability, TypeKey, TypeRegistry};
use crate::strategy::{ConstructionStrategy, StrategyCache};
use crate::traits::{AsyncSequence, Token, TokenKind, TokenReader, TokenWriter};
use crate::{BoxError, Error, write};

/// Converts lazily produced sequences to and from JSON arrays.
///
/// A converter owns a [`TypeRegistry`] describing the types it handles,
/// and memoizes per type both the capability resolution and the selected
/// [`ConstructionStrategy`]. It is `Send + Sync`; share it by reference.
///
/// # Example
///
/// ```ignore
/// let mut registry = TypeRegistry::new();
/// registry.register_element::<String>();
/// let converter = SequenceConverter::new(registry);
///
/// let list: Option<SequenceList<String>> = converter.from_json(r#"["a","b"]"#)?;
/// assert_eq!(converter.to_json(list.as_ref())?, r#"["a","b"]"#);
/// ```
#[derive(Debug)]
pub struct SequenceConverter {
    registry: TypeRegistry,
    config: ConverterConfig,
    capabilities: CapabilityResolver,
    strategies: StrategyCache,
}

impl SequenceConverter {
    /// Creates a converter with the default configuration.
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, ConverterConfig::default())
    }

    pub fn with_config(registry: TypeRegistry, config: ConverterConfig) -> Self {
        Self {
            registry,
            config,
            capabilities: CapabilityResolver::new(),
            strategies: StrategyCache::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Resolves the sequence capability of `key`.
    pub fn resolve(&self, key: TypeKey) -> Option<SequenceCapability> {
        self.capabilities.resolve(&self.registry, key)
    }

    /// Returns true if values of `key` are sequences this converter handles.
    pub fn can_handle(&self, key: TypeKey) -> bool {
        self.resolve(key).is_some()
    }

    #[inline]
    pub fn can_handle_type<T: ?Sized + 'static>(&self) -> bool {
        self.can_handle(TypeKey::of::<T>())
    }

    /// The construction strategy for reads into `T`.
    ///
    /// Fails with [`Error::TypeNotSupported`] if `T` has no sequence
    /// capability.
    pub fn strategy<T: 'static>(&self) -> Result<ConstructionStrategy<T>, Error> {
        let key = TypeKey::of::<T>();
        let capability = self.resolve(key).ok_or(Error::TypeNotSupported {
            type_name: key.name(),
        })?;
        self.strategies.get_or_select::<T>(&self.registry, capability)
    }

    /// Writes `value` as a JSON array, or `null` when absent.
    ///
    /// `T` must resolve to a sequence capability over `T::Item`, directly or
    /// through the capabilities it implements.
    pub async fn write_async<T>(
        &self,
        writer: &mut dyn TokenWriter,
        value: Option<&T>,
    ) -> Result<(), Error>
    where
        T: AsyncSequence + 'static,
        T::Item: Serialize + 'static,
    {
        let Some(value) = value else {
            return writer.write_null();
        };

        let key = TypeKey::of::<T>();
        let capability = self.resolve(key).ok_or(Error::NotASequence {
            type_name: key.name(),
        })?;
        if capability.element() != TypeKey::of::<T::Item>() {
            return Err(Error::Internal(format!(
                "`{}` is registered as a sequence of `{}` but produces `{}`",
                key.name(),
                capability.element().name(),
                core::any::type_name::<T::Item>(),
            )));
        }

        let count = write::write_elements(writer, value).await?;
        tracing::debug!(
            type_name = key.name(),
            element = capability.element().name(),
            count,
            "wrote sequence"
        );
        Ok(())
    }

    /// Blocking form of [`write_async`](Self::write_async).
    pub fn write<T>(&self, writer: &mut dyn TokenWriter, value: Option<&T>) -> Result<(), Error>
    where
        T: AsyncSequence + 'static,
        T::Item: Serialize + 'static,
    {
        futures::executor::block_on(self.write_async(writer, value))
    }

    /// Reads a value of `T` from the reader's current position.
    ///
    /// Returns `Ok(None)` when the current token is `null`. Otherwise the
    /// reader must be positioned on `[`, and is left positioned on the
    /// matching `]`. When `existing` is supplied, elements are appended to
    /// it and it is returned.
    pub async fn read_async<T>(
        &self,
        reader: &mut dyn TokenReader,
        existing: Option<T>,
    ) -> Result<Option<T>, Error>
    where
        T: Send + 'static,
    {
        match reader.current() {
            Some(Token::Null) => return Ok(None),
            Some(Token::StartArray) => {}
            other => {
                return Err(Error::MalformedToken {
                    found: other.map(Token::kind).unwrap_or(TokenKind::EndOfInput),
                });
            }
        }

        let type_name = core::any::type_name::<T>();
        let strategy = self.strategy::<T>()?;
        let mut budget = self.config.budget();

        match (strategy, existing) {
            (ConstructionStrategy::Mutable(factory), existing) => {
                let mut target = existing.unwrap_or_else(|| factory.blank());
                factory.populate(&mut target, reader, &mut budget)?;
                tracing::trace!(type_name, count = budget.count(), "populated sequence");
                Ok(Some(target))
            }
            (ConstructionStrategy::Unsupported, _) => Err(Error::TypeNotSupported { type_name }),
            (_, Some(_)) => Err(Error::AmbiguousExistingInstance { type_name }),
            (ConstructionStrategy::FromMaterialized(factory), None) => {
                let tracker = ConsumptionTracker::new();
                let built = factory.build(ElementCursor::new(reader, &tracker, budget));
                settle(type_name, &tracker, built).map(Some)
            }
            (ConstructionStrategy::FromLazy(factory), None) => {
                let tracker = ConsumptionTracker::new();
                let built = factory
                    .build(ElementCursor::new(reader, &tracker, budget))
                    .await;
                settle(type_name, &tracker, built).map(Some)
            }
        }
    }

    /// Blocking form of [`read_async`](Self::read_async).
    pub fn read<T>(&self, reader: &mut dyn TokenReader, existing: Option<T>) -> Result<Option<T>, Error>
    where
        T: Send + 'static,
    {
        futures::executor::block_on(self.read_async(reader, existing))
    }

    /// Renders `value` as compact JSON text.
    pub fn to_json<T>(&self, value: Option<&T>) -> Result<String, Error>
    where
        T: AsyncSequence + 'static,
        T::Item: Serialize + 'static,
    {
        let mut writer = JsonWriter::new();
        self.write(&mut writer, value)?;
        Ok(writer.into_string())
    }

    /// Parses JSON text holding an array of elements, or `null`.
    pub fn from_json<T>(&self, source: &str) -> Result<Option<T>, Error>
    where
        T: Send + 'static,
    {
        let mut reader = JsonTokenReader::new(source)?;
        let value = self.read(&mut reader, None)?;
        reader.advance()?;
        Ok(value)
    }
}

/// Checks the consumption contract once a constructor has returned.
fn settle<T>(
    type_name: &'static str,
    tracker: &ConsumptionTracker,
    built: Result<T, BoxError>,
) -> Result<T, Error> {
    if tracker.state() == ConsumptionState::AlreadyConsumed {
        tracing::warn!(type_name, "constructor iterated its sequence more than once");
        return Err(Error::DoubleConsumption { type_name });
    }
    match built {
        Err(err) if wraps_already_consumed(err.as_ref()) => {
            tracing::warn!(type_name, "constructor iterated its sequence more than once");
            Err(Error::DoubleConsumption { type_name })
        }
        Err(err) => match err.downcast::<Error>() {
            Ok(err) => Err(*err),
            Err(source) => Err(Error::Constructor { type_name, source }),
        },
        Ok(_) if !tracker.is_complete() => {
            tracing::warn!(
                type_name,
                state = ?tracker.state(),
                "constructor did not read its sequence to the end"
            );
            Err(Error::IncompleteConsumption { type_name })
        }
        Ok(value) => Ok(value),
    }
}
