//! Event dispatch capability

use crate::events::{ButtonEvent, NodeEvent, RadioEvent, SensorEvent};
use crate::node::Context;
use crate::traits::board::Board;

/// Receiver of driver events
///
/// The run loop pops events from the inbound queue and hands each one to
/// [`EventHandler::handle`], together with the node context. Handlers run to
/// completion on the run loop, never in interrupt context.
pub trait EventHandler<B: Board> {
    /// Sensor reading, battery voltage or sensor failure
    fn on_sensor_event(&mut self, event: SensorEvent, cx: &mut Context<'_, B>);

    /// Radio modem state change
    fn on_radio_event(&mut self, event: RadioEvent, cx: &mut Context<'_, B>);

    /// Button activity
    fn on_button_event(&mut self, event: ButtonEvent, cx: &mut Context<'_, B>);

    /// Route an event to the matching method
    fn handle(&mut self, event: NodeEvent, cx: &mut Context<'_, B>) {
        match event {
            NodeEvent::Sensor(event) => self.on_sensor_event(event, cx),
            NodeEvent::Radio(event) => self.on_radio_event(event, cx),
            NodeEvent::Button(event) => self.on_button_event(event, cx),
        }
    }
}
