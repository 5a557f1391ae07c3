/// One-shot callbacks deferred to the next editor idle tick.
///
/// A scheduled callback is removed from the queue when the tick fires, so
/// it runs exactly once per scheduling; work that must happen again after
/// a later event re-schedules itself at that point. Callbacks scheduled
/// while a drain is running land in the following tick.
pub struct IdleQueue<Ctx> {
    pending: Vec<Box<dyn FnOnce(&mut Ctx)>>,
}

impl<Ctx> Default for IdleQueue<Ctx> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<Ctx> IdleQueue<Ctx> {
    pub fn schedule(&mut self, callback: impl FnOnce(&mut Ctx) + 'static) {
        self.pending.push(Box::new(callback));
    }

    pub fn drain(&mut self) -> Vec<Box<dyn FnOnce(&mut Ctx)>> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
