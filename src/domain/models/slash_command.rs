#[cfg(test)]
#[path = "slash_command_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_view_courses()
            || cmd.is_view_groups()
            || cmd.is_view_partners()
            || cmd.is_view_assistant()
            || cmd.is_upload()
            || cmd.is_download()
            || cmd.is_join()
            || cmd.is_new_group()
            || cmd.is_connect()
            || cmd.is_find()
            || cmd.is_attach()
            || cmd.is_detach()
            || cmd.is_clear()
            || cmd.is_export()
            || cmd.is_reset()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Everything after the command, rejoined. Used for `;`-separated form
    /// payloads and search terms that contain spaces.
    pub fn arg_line(&self) -> String {
        return self.args.join(" ").trim().to_string();
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_view_courses(&self) -> bool {
        return self.command == "/courses";
    }

    pub fn is_view_groups(&self) -> bool {
        return self.command == "/groups";
    }

    pub fn is_view_partners(&self) -> bool {
        return self.command == "/partners";
    }

    pub fn is_view_assistant(&self) -> bool {
        return self.command == "/chat";
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_download(&self) -> bool {
        return ["/d", "/download"].contains(&self.command.as_str());
    }

    pub fn is_join(&self) -> bool {
        return ["/j", "/join"].contains(&self.command.as_str());
    }

    pub fn is_new_group(&self) -> bool {
        return ["/ng", "/newgroup"].contains(&self.command.as_str());
    }

    pub fn is_connect(&self) -> bool {
        return ["/co", "/connect"].contains(&self.command.as_str());
    }

    pub fn is_find(&self) -> bool {
        return ["/f", "/find"].contains(&self.command.as_str());
    }

    pub fn is_attach(&self) -> bool {
        return ["/a", "/attach"].contains(&self.command.as_str());
    }

    pub fn is_detach(&self) -> bool {
        return ["/da", "/detach"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/c", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_export(&self) -> bool {
        return ["/e", "/export"].contains(&self.command.as_str());
    }

    pub fn is_reset(&self) -> bool {
        return ["/r", "/reset"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
