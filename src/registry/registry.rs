use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::debug;
use tracing::info;

use super::InitialContentSource;
use super::Lifecycle;
use crate::validate_buffer_name;
use crate::Buffer;
use crate::BufferConfig;
use crate::ChangeNotifier;
use crate::Error;
use crate::NamedContent;
use crate::PathResolver;
use crate::Result;
use crate::SaveAck;
use crate::WatchContext;

/// Owns every active [`Buffer`], keyed by name in configuration order.
///
/// The map is only replaced by [`BufferRegistry::load_all`],
/// [`BufferRegistry::reconfigure`] and [`BufferRegistry::register_new`], each
/// of which closes the watcher of any buffer it replaces.
pub struct BufferRegistry {
    config: BufferConfig,
    resolver: PathResolver,
    buffers: IndexMap<String, Buffer>,
    ctx: WatchContext,
    initial_content: Arc<dyn InitialContentSource>,
}

impl std::fmt::Debug for BufferRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("BufferRegistry")
            .field("buffers", &self.buffers.keys().collect::<Vec<_>>())
            .field("active_watchers", &self.active_watchers())
            .finish()
    }
}

impl BufferRegistry {
    pub fn new(
        config: BufferConfig,
        notifier: ChangeNotifier,
        initial_content: Arc<dyn InitialContentSource>,
    ) -> Self {
        let resolver = PathResolver::from_config(&config);
        let ctx = WatchContext::new(notifier, &config.watch);
        Self {
            config,
            resolver,
            buffers: IndexMap::new(),
            ctx,
            initial_content,
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    pub fn is_dev(&self) -> bool {
        self.resolver.is_dev()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.buffers.contains_key(name)
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Result<&Buffer> {
        self.buffers
            .get(name)
            .ok_or_else(|| Error::UnknownBuffer(name.to_string()))
    }

    /// Live directory watches across every buffer this registry ever created
    pub fn active_watchers(&self) -> usize {
        self.ctx.active_watchers()
    }

    /// Rebuilds the collection from the configured buffer names, in order.
    /// The previous buffers are closed only once every new one resolved;
    /// on failure the registry is left as it was.
    pub async fn load_all(&mut self) -> Result<()> {
        let buffers = build_buffers(&self.resolver, &self.ctx, &self.config.buffers).await?;
        self.replace_buffers(buffers);
        Ok(())
    }

    /// Swaps in a new configuration (e.g. a new storage location) and reloads.
    /// Nothing is committed unless every buffer resolves under `config`.
    pub async fn reconfigure(
        &mut self,
        config: BufferConfig,
    ) -> Result<()> {
        let resolver = PathResolver::from_config(&config);
        let mut ctx = self.ctx.clone();
        ctx.debounce = config.watch.debounce();

        let buffers = build_buffers(&resolver, &ctx, &config.buffers).await?;
        self.resolver = resolver;
        self.ctx = ctx;
        self.config = config;
        self.replace_buffers(buffers);
        Ok(())
    }

    /// Builds a buffer for `name` whose changes are reported, tagged with the
    /// name, on this registry's notification channel.
    pub async fn load_one(
        &self,
        name: &str,
    ) -> Result<Buffer> {
        build_buffer(&self.resolver, &self.ctx, name).await
    }

    fn replace_buffers(
        &mut self,
        buffers: IndexMap<String, Buffer>,
    ) {
        self.close_all();
        self.buffers = buffers;
        info!(
            buffers = self.buffers.len(),
            watched = self.active_watchers(),
            "buffers loaded"
        );
    }

    /// Loads the buffer from disk when its file exists, otherwise returns
    /// placeholder content without touching the file.
    pub async fn load_if_exists(
        &self,
        name: &str,
    ) -> Result<NamedContent> {
        let buffer = self.get(name)?;
        if buffer.exists() && !self.config.environment.force_initial_content() {
            return buffer.load().await;
        }
        let content = self.initial_content.initial_content(self.is_dev());
        Ok((name.to_string(), content))
    }

    /// Registers (or replaces) `name` and pushes its current content through
    /// the change channel.
    pub async fn register_new(
        &mut self,
        name: &str,
    ) -> Result<()> {
        validate_buffer_name(name)?;
        let buffer = self.load_one(name).await?;
        if let Some(previous) = self.buffers.insert(name.to_string(), buffer) {
            previous.close();
        }

        let (name, content) = self.load_if_exists(name).await?;
        self.ctx.notifier().notify(&name, content);
        Ok(())
    }

    pub async fn save(
        &self,
        name: &str,
        content: &str,
    ) -> Result<SaveAck> {
        self.get(name)?.save(content).await
    }

    /// Saves, records the clean-exit flag and asks the host to terminate.
    pub async fn save_and_finalize(
        &self,
        name: &str,
        content: &str,
        lifecycle: &Lifecycle,
    ) -> Result<()> {
        self.save(name, content).await?;
        lifecycle.mark_content_saved();
        lifecycle.request_shutdown();
        Ok(())
    }

    /// Loads every registered buffer concurrently. Results are positional
    /// in registry order; any failure fails the whole listing.
    pub async fn list_all(&self) -> Result<Vec<NamedContent>> {
        join_all(self.buffers.values().map(|b| b.load()))
            .await
            .into_iter()
            .collect()
    }

    pub fn close_all(&self) {
        for buffer in self.buffers.values() {
            buffer.close();
        }
    }
}

async fn build_buffer(
    resolver: &PathResolver,
    ctx: &WatchContext,
    name: &str,
) -> Result<Buffer> {
    let path = resolver.canonical_path(name).await?;
    debug!(buffer = %name, path = %path.display(), "buffer resolved");
    Ok(Buffer::new(name, path, ctx.clone()))
}

/// Resolves every name; dropping a partial result releases its watchers.
async fn build_buffers(
    resolver: &PathResolver,
    ctx: &WatchContext,
    names: &[String],
) -> Result<IndexMap<String, Buffer>> {
    let mut buffers = IndexMap::with_capacity(names.len());
    for name in names {
        let buffer = build_buffer(resolver, ctx, name).await?;
        buffers.insert(name.clone(), buffer);
    }
    Ok(buffers)
}
