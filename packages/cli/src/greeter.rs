//! Demo robot that comments on what happens in a wave.

use ripple_editor::{DocumentEditor, EditorError, TextFormat, WaveletEditor};
use ripple_model::{BlipId, Context};
use ripple_robot::{Capabilities, Event, RobotError};
use std::sync::Arc;

pub const DELETE_COMMAND: &str = "DELETE";

/// Capabilities of the greeter, acting as `robot_id`
pub fn capabilities(robot_id: &str) -> Capabilities {
    let id: Arc<str> = Arc::from(robot_id);

    let mut caps = Capabilities::new();

    let me = Arc::clone(&id);
    caps.insert("wavelet_self_added", move |event, ctx| {
        let message = format!(
            "Hello everyone, I am {me}!\n\
             * I will say hello and goodbye as people arrive or leave the wave.\n\
             * Submit a blip containing only \"{DELETE_COMMAND}\" and I'll delete it for you."
        );
        reply_wavelet(event, ctx, &message)
    });

    caps.insert("wavelet_self_removed", |event, ctx| reply_wavelet(event, ctx, "Goodbye world!"));

    let me = Arc::clone(&id);
    caps.insert("wavelet_participants_changed", move |event, ctx| {
        for participant in &event.properties.participants_added {
            if participant.as_str() != &*me {
                reply_wavelet(event, ctx, &format!("Hello {participant}!"))?;
            }
        }
        for participant in &event.properties.participants_removed {
            if participant.as_str() != &*me {
                reply_wavelet(event, ctx, &format!("Goodbye {participant}!"))?;
            }
        }
        Ok(())
    });

    let me = Arc::clone(&id);
    caps.insert("wavelet_blip_created", move |event, ctx| {
        if event.modified_by == *me {
            return Ok(());
        }
        let message = format!("{} created a blip! I would have done it better, though...", event.modified_by);
        reply_blip(event, ctx, &message)
    });

    let me = Arc::clone(&id);
    caps.insert("blip_deleted", move |event, ctx| {
        if event.modified_by == *me {
            return Ok(());
        }
        let message = format!("{} deleted a blip! Which one will be next?", event.modified_by);
        reply_wavelet(event, ctx, &message)
    });

    let me = Arc::clone(&id);
    caps.insert("wavelet_title_changed", move |event, ctx| {
        if event.modified_by == *me {
            return Ok(());
        }
        let title = event.properties.title.as_deref().unwrap_or_default();
        reply_wavelet(event, ctx, &format!("{} changed the title to: {title}", event.modified_by))
    });

    let me = id;
    caps.insert("blip_submitted", move |event, ctx| {
        if event.modified_by == *me {
            return Ok(());
        }

        let blip_id = event_blip(event)?;
        let blip = ctx
            .blip(&blip_id)
            .ok_or_else(|| EditorError::BlipNotFound(blip_id.clone()))?;

        if blip.content != DELETE_COMMAND {
            let message = format!("{} submitted a blip! Show off!", event.modified_by);
            return reply_blip(event, ctx, &message);
        }

        if blip.is_root() {
            let message = format!("Silly {}! I can't delete the root blip, can I?", event.modified_by);
            reply_blip(event, ctx, &message)
        } else {
            DocumentEditor::open(ctx, &blip_id)?.delete()?;
            Ok(())
        }
    });

    caps
}

fn event_blip(event: &Event) -> Result<BlipId, RobotError> {
    event
        .blip_id()
        .cloned()
        .ok_or_else(|| RobotError::handler(format!("{} event carries no blip", event.kind)))
}

/// Reply under the blip the event was generated by
fn reply_blip(event: &Event, ctx: &mut Context, message: &str) -> Result<(), RobotError> {
    let blip_id = event_blip(event)?;
    let reply = DocumentEditor::open(ctx, &blip_id)?.create_child_blip()?;
    DocumentEditor::open(ctx, &reply)?.append_text(message, TextFormat::Plain)?;
    Ok(())
}

/// Reply at the end of the wavelet the event was generated in
fn reply_wavelet(event: &Event, ctx: &mut Context, message: &str) -> Result<(), RobotError> {
    let wavelet_id = if event.wavelet_id.is_empty() {
        let blip_id = event_blip(event)?;
        ctx.blip(&blip_id)
            .map(|blip| blip.wavelet_id.clone())
            .ok_or(EditorError::BlipNotFound(blip_id))?
    } else {
        event.wavelet_id.clone()
    };

    let reply = WaveletEditor::open(ctx, &wavelet_id)?.create_blip()?;
    DocumentEditor::open(ctx, &reply)?.append_text(message, TextFormat::Plain)?;
    Ok(())
}
