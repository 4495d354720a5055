//! Generic stack-based state machine.
//!
//! [`StateMachine`] drives behavior for anything with an owner type: actor
//! brains use `StateMachine<Agent>` (see
//! [`Brain`](crate::components::brain::Brain)), while scene managers or
//! other host-side orchestrators instantiate it with their own owner.
//! States are an open polymorphic set: any type implementing [`State<O>`]
//! can be pushed.
//!
//! # Architecture
//!
//! - **LIFO stack** – the top state is the only one receiving update,
//!   draw, input, and message calls. An empty stack is a valid idle
//!   machine; every forwarding call on it is a no-op.
//! - **Owner by reference** – the owner is passed as `&mut O` into every
//!   hook instead of being stored, so the machine can live inside an ECS
//!   component without lifetime gymnastics.
//! - **Transition requests** – `update` hooks return
//!   `Option<Transition<O>>`; the machine applies the request immediately
//!   after the hook returns. This mirrors the request/apply split used for
//!   phase transitions (a state cannot restructure the machine it is
//!   currently borrowed from).
//!
//! # Example
//!
//! ```ignore
//! struct Patrol;
//! impl State<Agent> for Patrol {
//!     fn update(&mut self, agent: &mut Agent, _dt: f32) -> Option<Transition<Agent>> {
//!         if agent.body.speed() < 0.1 {
//!             return Some(Transition::Change(Box::new(Rest)));
//!         }
//!         None
//!     }
//! }
//! ```

use std::any::{Any, TypeId};

use smallvec::SmallVec;

use crate::events::telegram::Telegram;

/// Capability set implemented by anything that can sit on a
/// [`StateMachine`] stack.
///
/// All hooks have no-op defaults; states implement only what they need.
/// `on_message` reports whether the telegram was handled; unhandled
/// messages are legitimate and merely logged by the dispatcher.
pub trait State<O>: Any + Send + Sync {
    /// Called once when the state becomes the top of the stack.
    fn on_enter(&mut self, _owner: &mut O) {}

    /// Called once when the state stops being the top of the stack
    /// (popped, replaced, or covered by a push).
    fn on_exit(&mut self, _owner: &mut O) {}

    /// Called every frame while this state is on top. Return a
    /// [`Transition`] to restructure the stack.
    fn update(&mut self, _owner: &mut O, _dt: f32) -> Option<Transition<O>> {
        None
    }

    /// Input hook, forwarded by the host when it polls input.
    fn check_input(&mut self, _owner: &mut O) {}

    /// Draw hook, forwarded by the host during rendering.
    fn draw(&mut self, _owner: &mut O) {}

    /// Telegram handler. Return `true` if the message was handled.
    fn on_message(&mut self, _owner: &mut O, _telegram: &Telegram) -> bool {
        false
    }
}

/// A stack restructuring requested by a state's `update` hook.
pub enum Transition<O> {
    /// Exit the current top, discard the whole stack, enter the new state.
    Change(Box<dyn State<O>>),
    /// Exit the current top (keeping it beneath), enter the new state.
    Push(Box<dyn State<O>>),
    /// Exit and remove the current top, re-enter the state beneath it.
    Pop,
}

impl<O> std::fmt::Debug for Transition<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Change(_) => f.write_str("Change"),
            Transition::Push(_) => f.write_str("Push"),
            Transition::Pop => f.write_str("Pop"),
        }
    }
}

/// Stack of polymorphic states; the top state is active.
pub struct StateMachine<O> {
    stack: SmallVec<[Box<dyn State<O>>; 2]>,
}

impl<O: 'static> Default for StateMachine<O> {
    fn default() -> Self {
        Self::new()
    }
}

// `State<O>: Any` pins the trait objects to 'static, so the owner type
// has to be 'static as well.
impl<O: 'static> StateMachine<O> {
    /// Create an empty (idle) machine.
    pub fn new() -> Self {
        Self {
            stack: SmallVec::new(),
        }
    }

    /// Number of states on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the machine is idle (no states).
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether the active state is of concrete type `S`.
    pub fn current_is<S: State<O>>(&self) -> bool {
        // Upcast before asking for the type id; on `dyn State<O>` itself
        // the call would resolve to the blanket impl and name the trait
        // object type instead of the concrete state.
        self.stack
            .last()
            .is_some_and(|top| (&**top as &dyn Any).type_id() == TypeId::of::<S>())
    }

    /// Hard reset: exit the current top, discard all stacked history, push
    /// `new` and enter it. The stack has depth exactly 1 afterwards.
    pub fn change_state(&mut self, owner: &mut O, new: Box<dyn State<O>>) {
        if let Some(top) = self.stack.last_mut() {
            top.on_exit(owner);
        }
        self.stack.clear();
        self.stack.push(new);
        if let Some(top) = self.stack.last_mut() {
            top.on_enter(owner);
        }
    }

    /// Push `new` on top of the current state, preserving history beneath.
    ///
    /// Pushing a state of the same concrete type as the current top is
    /// suppressed (no exit/enter runs, depth is unchanged) and reported by
    /// the `false` return.
    pub fn push_state(&mut self, owner: &mut O, new: Box<dyn State<O>>) -> bool {
        if let Some(top) = self.stack.last() {
            let top_id = (&**top as &dyn Any).type_id();
            let new_id = (&*new as &dyn Any).type_id();
            if top_id == new_id {
                return false;
            }
        }
        if let Some(top) = self.stack.last_mut() {
            top.on_exit(owner);
        }
        self.stack.push(new);
        if let Some(top) = self.stack.last_mut() {
            top.on_enter(owner);
        }
        true
    }

    /// Exit and remove the current top, re-entering the state it covered.
    ///
    /// Returns `false` (no-op) on an empty stack. No enter call is made
    /// when the stack becomes empty.
    pub fn pop_state(&mut self, owner: &mut O) -> bool {
        let Some(mut top) = self.stack.pop() else {
            return false;
        };
        top.on_exit(owner);
        if let Some(uncovered) = self.stack.last_mut() {
            uncovered.on_enter(owner);
        }
        true
    }

    /// Forward a frame update to the active state and apply any transition
    /// it requests. No-op when idle.
    pub fn update(&mut self, owner: &mut O, dt: f32) {
        let transition = match self.stack.last_mut() {
            Some(top) => top.update(owner, dt),
            None => None,
        };
        if let Some(transition) = transition {
            self.apply(owner, transition);
        }
    }

    /// Forward the input hook to the active state. No-op when idle.
    pub fn check_input(&mut self, owner: &mut O) {
        if let Some(top) = self.stack.last_mut() {
            top.check_input(owner);
        }
    }

    /// Forward the draw hook to the active state. No-op when idle.
    pub fn draw(&mut self, owner: &mut O) {
        if let Some(top) = self.stack.last_mut() {
            top.draw(owner);
        }
    }

    /// Route a telegram to the active state. Returns `false` when idle or
    /// when the state declines the message.
    pub fn handle_message(&mut self, owner: &mut O, telegram: &Telegram) -> bool {
        match self.stack.last_mut() {
            Some(top) => top.on_message(owner, telegram),
            None => false,
        }
    }

    /// Apply a transition request.
    pub fn apply(&mut self, owner: &mut O, transition: Transition<O>) {
        match transition {
            Transition::Change(new) => self.change_state(owner, new),
            Transition::Push(new) => {
                self.push_state(owner, new);
            }
            Transition::Pop => {
                self.pop_state(owner);
            }
        }
    }
}

impl<O> std::fmt::Debug for StateMachine<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("depth", &self.stack.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agentid::AgentId;

    /// A scene-manager-like owner: the machine is generic, so nothing here
    /// touches the ECS.
    #[derive(Default)]
    struct Stage {
        log: Vec<String>,
        frames: u32,
    }

    struct Title;
    impl State<Stage> for Title {
        fn on_enter(&mut self, stage: &mut Stage) {
            stage.log.push("enter title".into());
        }
        fn on_exit(&mut self, stage: &mut Stage) {
            stage.log.push("exit title".into());
        }
        fn update(&mut self, stage: &mut Stage, _dt: f32) -> Option<Transition<Stage>> {
            stage.frames += 1;
            None
        }
    }

    struct Play;
    impl State<Stage> for Play {
        fn on_enter(&mut self, stage: &mut Stage) {
            stage.log.push("enter play".into());
        }
        fn on_exit(&mut self, stage: &mut Stage) {
            stage.log.push("exit play".into());
        }
        fn on_message(&mut self, _stage: &mut Stage, telegram: &Telegram) -> bool {
            telegram.msg == 1
        }
    }

    struct Pause;
    impl State<Stage> for Pause {
        fn on_enter(&mut self, stage: &mut Stage) {
            stage.log.push("enter pause".into());
        }
        fn on_exit(&mut self, stage: &mut Stage) {
            stage.log.push("exit pause".into());
        }
        fn update(&mut self, _stage: &mut Stage, _dt: f32) -> Option<Transition<Stage>> {
            Some(Transition::Pop)
        }
    }

    fn telegram(msg: i32) -> Telegram {
        Telegram {
            sender: AgentId(1),
            receiver: AgentId(2),
            msg,
            dispatch_time: 0.0,
            extra: None,
        }
    }

    // ==================== STACK OPERATION TESTS ====================

    #[test]
    fn test_empty_machine_is_idle() {
        let mut fsm: StateMachine<Stage> = StateMachine::new();
        let mut stage = Stage::default();
        assert!(fsm.is_empty());
        fsm.update(&mut stage, 0.016);
        fsm.check_input(&mut stage);
        fsm.draw(&mut stage);
        assert!(!fsm.handle_message(&mut stage, &telegram(1)));
        assert!(!fsm.pop_state(&mut stage));
        assert!(stage.log.is_empty());
    }

    #[test]
    fn test_change_state_enters_new_state() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Title));
        assert_eq!(fsm.depth(), 1);
        assert!(fsm.current_is::<Title>());
        assert_eq!(stage.log, vec!["enter title"]);
    }

    #[test]
    fn test_change_state_discards_stack_history() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Title));
        fsm.push_state(&mut stage, Box::new(Play));
        fsm.push_state(&mut stage, Box::new(Pause));
        assert_eq!(fsm.depth(), 3);

        let before = stage.log.len();
        fsm.change_state(&mut stage, Box::new(Title));
        // Hard reset: depth is exactly 1, only the old top was exited.
        // Play sits covered beneath Pause and must be discarded silently.
        assert_eq!(fsm.depth(), 1);
        assert_eq!(stage.log[before..], ["exit pause", "enter title"]);
    }

    #[test]
    fn test_push_exits_covered_state_and_pop_reenters_it() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Play));
        fsm.push_state(&mut stage, Box::new(Pause));
        assert_eq!(
            stage.log,
            vec!["enter play", "exit play", "enter pause"]
        );

        assert!(fsm.pop_state(&mut stage));
        assert_eq!(fsm.depth(), 1);
        assert!(fsm.current_is::<Play>());
        assert_eq!(stage.log.last().unwrap(), "enter play");
    }

    #[test]
    fn test_push_duplicate_type_is_suppressed() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Pause));
        let log_len = stage.log.len();

        assert!(!fsm.push_state(&mut stage, Box::new(Pause)));
        // Depth unchanged, no enter/exit ran.
        assert_eq!(fsm.depth(), 1);
        assert_eq!(stage.log.len(), log_len);
    }

    #[test]
    fn test_push_different_type_is_accepted() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Play));
        assert!(fsm.push_state(&mut stage, Box::new(Pause)));
        assert_eq!(fsm.depth(), 2);
        assert!(fsm.current_is::<Pause>());
    }

    #[test]
    fn test_pop_to_empty_makes_no_enter_call() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Title));
        assert!(fsm.pop_state(&mut stage));
        assert!(fsm.is_empty());
        assert_eq!(stage.log, vec!["enter title", "exit title"]);
    }

    // ==================== DISPATCH TESTS ====================

    #[test]
    fn test_update_reaches_top_only() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Title));
        fsm.push_state(&mut stage, Box::new(Play));

        fsm.update(&mut stage, 0.016);
        // Play has no update counter; Title underneath must not run.
        assert_eq!(stage.frames, 0);
    }

    #[test]
    fn test_update_applies_returned_transition() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Play));
        fsm.push_state(&mut stage, Box::new(Pause));

        // Pause requests a pop from its update hook.
        fsm.update(&mut stage, 0.016);
        assert_eq!(fsm.depth(), 1);
        assert!(fsm.current_is::<Play>());
    }

    #[test]
    fn test_handle_message_reports_handled_flag() {
        let mut fsm = StateMachine::new();
        let mut stage = Stage::default();
        fsm.change_state(&mut stage, Box::new(Play));
        assert!(fsm.handle_message(&mut stage, &telegram(1)));
        assert!(!fsm.handle_message(&mut stage, &telegram(99)));
    }
}
