// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maroid plugins list`.

use std::io::{self, Write};
use std::sync::Arc;

use maroid_chat::ChatRouter;
use maroid_core::ChatCommandScope;
use maroid_plugin::Registries;

/// Writes one block per loaded plugin, then the chat command menu.
pub fn list(registries: &Arc<Registries>, out: &mut impl Write) -> io::Result<()> {
    if registries.plugins.is_empty() {
        writeln!(out, "no plugins loaded")?;
        return Ok(());
    }

    for plugin in &registries.plugins {
        writeln!(
            out,
            "{} {} (api {})",
            plugin.id, plugin.meta.version, plugin.meta.api_version
        )?;
        writeln!(out, "  origin: {}", plugin.origin)?;
        let capabilities: Vec<String> = plugin.capabilities.iter().map(|c| c.to_string()).collect();
        if capabilities.is_empty() {
            writeln!(out, "  capabilities: none")?;
        } else {
            writeln!(out, "  capabilities: {}", capabilities.join(", "))?;
        }
    }

    let menu = ChatRouter::new(Arc::clone(registries)).command_menu();
    if !menu.is_empty() {
        writeln!(out)?;
        writeln!(out, "chat commands:")?;
        for group in menu {
            writeln!(out, "  [{}]", scope_label(&group.scope))?;
            for (command, description) in group.commands {
                writeln!(out, "    /{command} - {description}")?;
            }
        }
    }
    Ok(())
}

fn scope_label(scope: &ChatCommandScope) -> String {
    match scope {
        ChatCommandScope::Default => "default".to_string(),
        ChatCommandScope::AllPrivateChats => "all private chats".to_string(),
        ChatCommandScope::AllGroupChats => "all group chats".to_string(),
        ChatCommandScope::AllChatAdministrators => "all chat administrators".to_string(),
        ChatCommandScope::Chat { chat_id } => format!("chat {chat_id}"),
    }
}
