//! Hook Registry
//!
//! Contains:
//! - `HookRegistry` - stores hooks per event and runs them in registration order

use crate::core::{LeadHooksError, LeadHooksResult};
use crate::leads::{LeadData, LeadRecord, MessageType, OutreachResult};
use crate::plugins::PluginDescriptor;

use super::types::{
    AfterClassificationFn, AfterOutreachFn, BeforeClassificationFn, BeforeOutreachFn, Hook,
    HookEvent, HookFailurePolicy,
};

/// A callback plus the plugin that registered it
struct Registered<F> {
    plugin: String,
    hook: F,
}

/// Central registry for all hooks
///
/// Each event keeps its own ordered list, typed with that event's call
/// signature. Callbacks run in the order they were registered.
///
/// # Example
///
/// ```ignore
/// let mut hooks = HookRegistry::new();
///
/// hooks.register(
///     "scoring",
///     Hook::after_classification(|mut record| {
///         if record.score_fit.unwrap_or(0.0) >= 9.0 {
///             record.add_tag("high-fit");
///         }
///         Ok(record)
///     }),
/// );
///
/// let record = hooks.run_after_classification(record)?;
/// ```
#[derive(Default)]
pub struct HookRegistry {
    before_classification: Vec<Registered<BeforeClassificationFn>>,
    after_classification: Vec<Registered<AfterClassificationFn>>,
    before_outreach: Vec<Registered<BeforeOutreachFn>>,
    after_outreach: Vec<Registered<AfterOutreachFn>>,
    failure_policy: HookFailurePolicy,
}

impl HookRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what happens when a callback fails
    pub fn with_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// The active failure policy
    pub fn failure_policy(&self) -> HookFailurePolicy {
        self.failure_policy
    }

    /// Add a hook on behalf of a plugin
    pub fn register(&mut self, plugin: &str, hook: Hook) -> &mut Self {
        tracing::debug!("[HookRegistry] Registering {} from plugin '{}'", hook.event(), plugin);

        let plugin = plugin.to_string();
        match hook {
            Hook::BeforeClassification(hook) => {
                self.before_classification.push(Registered { plugin, hook })
            }
            Hook::AfterClassification(hook) => {
                self.after_classification.push(Registered { plugin, hook })
            }
            Hook::BeforeOutreach(hook) => self.before_outreach.push(Registered { plugin, hook }),
            Hook::AfterOutreach(hook) => self.after_outreach.push(Registered { plugin, hook }),
        }
        self
    }

    /// Add every hook a plugin declared, in declaration order
    pub fn merge(&mut self, plugin: &str, descriptor: &PluginDescriptor) -> &mut Self {
        for hook in &descriptor.hooks {
            self.register(plugin, hook.clone());
        }
        self
    }

    /// Check if there are any hooks for an event
    pub fn has_hooks(&self, event: HookEvent) -> bool {
        self.hook_count(event) > 0
    }

    /// Get the number of hooks for an event
    pub fn hook_count(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::BeforeClassification => self.before_classification.len(),
            HookEvent::AfterClassification => self.after_classification.len(),
            HookEvent::BeforeOutreach => self.before_outreach.len(),
            HookEvent::AfterOutreach => self.after_outreach.len(),
        }
    }

    /// Plugins with a hook on this event, in invocation order
    pub fn plugins_for(&self, event: HookEvent) -> Vec<&str> {
        fn names<F>(lane: &[Registered<F>]) -> Vec<&str> {
            lane.iter().map(|r| r.plugin.as_str()).collect()
        }

        match event {
            HookEvent::BeforeClassification => names(&self.before_classification),
            HookEvent::AfterClassification => names(&self.after_classification),
            HookEvent::BeforeOutreach => names(&self.before_outreach),
            HookEvent::AfterOutreach => names(&self.after_outreach),
        }
    }

    /// True when no hooks are registered at all
    pub fn is_empty(&self) -> bool {
        HookEvent::ALL.iter().all(|event| !self.has_hooks(*event))
    }

    /// Run `before_classification` hooks, chaining the lead data
    pub fn run_before_classification(&self, lead: LeadData) -> LeadHooksResult<LeadData> {
        self.chain(
            HookEvent::BeforeClassification,
            &self.before_classification,
            lead,
            |hook, lead| hook(lead),
        )
    }

    /// Run `after_classification` hooks, chaining the lead record
    pub fn run_after_classification(&self, record: LeadRecord) -> LeadHooksResult<LeadRecord> {
        self.chain(
            HookEvent::AfterClassification,
            &self.after_classification,
            record,
            |hook, record| hook(record),
        )
    }

    /// Run `before_outreach` hooks, chaining the lead data
    pub fn run_before_outreach(
        &self,
        lead: LeadData,
        message_type: MessageType,
    ) -> LeadHooksResult<LeadData> {
        self.chain(
            HookEvent::BeforeOutreach,
            &self.before_outreach,
            lead,
            |hook, lead| hook(lead, message_type),
        )
    }

    /// Run `after_outreach` hooks
    ///
    /// These hooks only observe; nothing they do flows back into the pipeline.
    pub fn run_after_outreach(&self, result: &OutreachResult, lead: &LeadData) -> LeadHooksResult<()> {
        for registered in &self.after_outreach {
            tracing::debug!(
                "[HookRegistry] Calling {} on plugin '{}'",
                HookEvent::AfterOutreach,
                registered.plugin
            );

            if let Err(source) = (registered.hook)(result, lead) {
                self.on_failure(HookEvent::AfterOutreach, &registered.plugin, source)?;
            }
        }
        Ok(())
    }

    /// Run a lane of chained hooks
    ///
    /// Each callback receives the previous callback's output. Under
    /// `Isolate`, a failing callback is skipped and its input is passed on.
    fn chain<T, F>(
        &self,
        event: HookEvent,
        lane: &[Registered<F>],
        payload: T,
        call: impl Fn(&F, T) -> anyhow::Result<T>,
    ) -> LeadHooksResult<T>
    where
        T: Clone,
    {
        let mut current = payload;

        for registered in lane {
            tracing::debug!("[HookRegistry] Calling {} on plugin '{}'", event, registered.plugin);

            current = match self.failure_policy {
                HookFailurePolicy::Propagate => {
                    call(&registered.hook, current).map_err(|source| LeadHooksError::HookFailed {
                        plugin: registered.plugin.clone(),
                        event,
                        source,
                    })?
                }
                HookFailurePolicy::Isolate => {
                    let before = current.clone();
                    match call(&registered.hook, current) {
                        Ok(next) => next,
                        Err(source) => {
                            self.on_failure(event, &registered.plugin, source)?;
                            before
                        }
                    }
                }
            };
        }

        Ok(current)
    }

    fn on_failure(&self, event: HookEvent, plugin: &str, source: anyhow::Error) -> LeadHooksResult<()> {
        match self.failure_policy {
            HookFailurePolicy::Propagate => Err(LeadHooksError::HookFailed {
                plugin: plugin.to_string(),
                event,
                source,
            }),
            HookFailurePolicy::Isolate => {
                tracing::error!(
                    "[HookRegistry] Error calling {} on plugin '{}': {:#}",
                    event,
                    plugin,
                    source
                );
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for event in HookEvent::ALL {
            map.entry(&event, &self.hook_count(event));
        }
        map.finish()
    }
}
