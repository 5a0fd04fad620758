//! Input commands and the queue that carries them to the frame driver

use std::collections::VecDeque;

use crate::error::{Result, Spin3dError};
use crate::shading::RenderMode;
use crate::shapes::ShapeKind;

/// One user action. Hosts translate their native events into these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    /// Positive delta zooms out, like a browser wheel event
    Wheel { delta: f32 },
    SelectShape(ShapeKind),
    SetMode(RenderMode),
    ToggleMode,
    /// 0 to 100
    SetSpeed(f32),
    SetSize(f32),
    SetHue(f32),
    SetGlow(bool),
    SetZoom(f32),
    AdjustSpeed(f32),
    AdjustSize(f32),
    AdjustHue(f32),
    ToggleGlow,
    /// Direct rotation step in radians
    Nudge { dx: f32, dy: f32, dz: f32 },
    ResetView,
}

impl Input {
    /// False when any carried number is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match *self {
            Input::PointerDown { x, y } | Input::PointerMove { x, y } => {
                x.is_finite() && y.is_finite()
            }
            Input::Wheel { delta } => delta.is_finite(),
            Input::SetSpeed(v)
            | Input::SetSize(v)
            | Input::SetHue(v)
            | Input::SetZoom(v)
            | Input::AdjustSpeed(v)
            | Input::AdjustSize(v)
            | Input::AdjustHue(v) => v.is_finite(),
            Input::Nudge { dx, dy, dz } => dx.is_finite() && dy.is_finite() && dz.is_finite(),
            Input::PointerUp
            | Input::PointerLeave
            | Input::SelectShape(_)
            | Input::SetMode(_)
            | Input::ToggleMode
            | Input::SetGlow(_)
            | Input::ToggleGlow
            | Input::ResetView => true,
        }
    }
}

/// Bounded FIFO of pending input, drained once per tick
#[derive(Debug)]
pub struct InputQueue {
    pending: VecDeque<Input>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a command.
    ///
    /// Consecutive pointer moves are merged into the latest one. Commands
    /// carrying NaN or infinite values are rejected.
    pub fn push(&mut self, input: Input) -> Result<()> {
        if !input.is_finite() {
            return Err(Spin3dError::NonFiniteInput(format!("{input:?}")));
        }

        let merges = matches!(input, Input::PointerMove { .. })
            && matches!(self.pending.back(), Some(Input::PointerMove { .. }));
        if merges {
            // Positions are absolute, the newest move subsumes the last
            if let Some(last) = self.pending.back_mut() {
                *last = input;
            }
            return Ok(());
        }

        if self.pending.len() >= self.capacity {
            return Err(Spin3dError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.pending.push_back(input);
        Ok(())
    }

    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, Input> {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = InputQueue::new(8);
        queue.push(Input::SetSpeed(10.0)).unwrap();
        queue.push(Input::SelectShape(ShapeKind::Torus)).unwrap();
        queue.push(Input::SetGlow(true)).unwrap();

        let drained: Vec<Input> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                Input::SetSpeed(10.0),
                Input::SelectShape(ShapeKind::Torus),
                Input::SetGlow(true),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rejects_when_full() {
        let mut queue = InputQueue::new(2);
        queue.push(Input::PointerUp).unwrap();
        queue.push(Input::ResetView).unwrap();
        let err = queue.push(Input::ToggleMode).unwrap_err();
        assert!(matches!(err, Spin3dError::QueueFull { capacity: 2 }));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut queue = InputQueue::new(8);
        for input in [
            Input::SetSpeed(f32::NAN),
            Input::SetZoom(f32::INFINITY),
            Input::Wheel { delta: f32::NAN },
            Input::PointerMove {
                x: 1.0,
                y: f32::NEG_INFINITY,
            },
            Input::Nudge {
                dx: 0.0,
                dy: f32::NAN,
                dz: 0.0,
            },
        ] {
            let err = queue.push(input).unwrap_err();
            assert!(matches!(err, Spin3dError::NonFiniteInput(_)), "{input:?}");
        }
        assert!(queue.is_empty());

        queue.push(Input::SetSpeed(0.0)).unwrap();
        queue.push(Input::ResetView).unwrap();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_consecutive_moves_merge() {
        let mut queue = InputQueue::new(2);
        queue.push(Input::PointerDown { x: 0.0, y: 0.0 }).unwrap();
        for i in 0..50 {
            queue
                .push(Input::PointerMove {
                    x: i as f32,
                    y: 0.0,
                })
                .unwrap();
        }
        let drained: Vec<Input> = queue.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1], Input::PointerMove { x: 49.0, y: 0.0 });
    }
}
