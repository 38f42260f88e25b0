use std::{
    collections::HashMap,
    fmt::Debug,
    future::Future,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::watch::{channel as watch_channel, Receiver, Sender};

use crate::{CoalescionServiceConfig, Error};

type Slot<Value> = Receiver<Option<Arc<Value>>>;

#[derive(Debug)]
#[allow(clippy::type_complexity)]
pub struct CoalescionService<Id: Hash + Eq, Value> {
    config: Arc<CoalescionServiceConfig>,
    watchers: Arc<Mutex<HashMap<Id, Slot<Value>>>>,
}

// Manual impl so `Value` does not need to be `Clone`
impl<Id: Hash + Eq, Value> Clone for CoalescionService<Id, Value> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            watchers: self.watchers.clone(),
        }
    }
}

enum Role<Value> {
    Wait(Slot<Value>),
    Lead(Sender<Option<Arc<Value>>>, Slot<Value>),
}

/// Removes the in-flight entry once the leading task finishes or is dropped
struct InFlight<'a, Id: Hash + Eq, Value> {
    watchers: &'a Mutex<HashMap<Id, Slot<Value>>>,
    id: &'a Id,
    receiver: &'a Slot<Value>,
}

impl<Id: Hash + Eq, Value> Drop for InFlight<'_, Id, Value> {
    fn drop(&mut self) {
        let mut watchers = self
            .watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // only remove our own entry, a new leader may have taken the key
        if watchers
            .get(self.id)
            .is_some_and(|current| current.same_channel(self.receiver))
        {
            watchers.remove(self.id);
        }
    }
}

impl<Id: Hash + Eq + Clone + Debug, Value> CoalescionService<Id, Value> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CoalescionServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            watchers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn watchers(&self) -> MutexGuard<'_, HashMap<Id, Slot<Value>>> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait_for(&self, mut receiver: Slot<Value>) -> Result<Arc<Value>, Error> {
        receiver
            .wait_for(|v| v.is_some())
            .await
            .map_err(|_| Error::RecvError)
            .and_then(|r| r.clone().ok_or(Error::RecvError))
    }

    async fn lead<F: FnOnce() -> Fut, Fut: Future<Output = Value>>(
        &self,
        id: &Id,
        send: Sender<Option<Arc<Value>>>,
        receiver: Slot<Value>,
        func: F,
    ) -> Arc<Value> {
        let _in_flight = InFlight {
            watchers: &self.watchers,
            id,
            receiver: &receiver,
        };

        let value = Arc::new(func().await);
        send.send_replace(Some(value.clone()));
        value
    }

    /// Run `func` for `id`, or wait for the run already in flight for `id`
    ///
    /// If the task being waited on is dropped before producing a value, the
    /// waiter takes over and runs its own `func`.
    pub async fn execute<F: FnOnce() -> Fut, Fut: Future<Output = Value>>(
        &self,
        id: Id,
        func: F,
    ) -> Result<Arc<Value>, Error> {
        loop {
            let role = {
                let mut watchers = self.watchers();

                if let Some(receiver) = watchers.get(&id) {
                    Role::Wait(receiver.clone())
                } else {
                    if let Some(max_concurrent) = self.config.max_concurrent {
                        if watchers.len() >= max_concurrent {
                            return Err(Error::MaxConcurrent);
                        }
                    }

                    let (send, recv) = watch_channel(None);
                    watchers.insert(id.clone(), recv.clone());
                    Role::Lead(send, recv)
                }
            };

            match role {
                Role::Lead(send, receiver) => {
                    return Ok(self.lead(&id, send, receiver, func).await);
                }
                Role::Wait(receiver) => match self.wait_for(receiver).await {
                    Err(Error::RecvError) => {
                        log::debug!("In-flight task for {id:?} was dropped, taking over");
                    }
                    result => return result,
                },
            }
        }
    }

    pub fn current_task_count(&self) -> usize {
        self.watchers().len()
    }
}

impl<Id: Hash + Eq + Clone + Debug, Value> Default for CoalescionService<Id, Value> {
    fn default() -> Self {
        Self::from_config(CoalescionServiceConfig::default())
    }
}
