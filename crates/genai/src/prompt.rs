//! Prompt builders.

use std::fmt::Write as _;

use roombrief_core::project::Project;

/// Brief for a professional designer, built from the client's project.
pub fn project_summary_prompt(project: &Project, reply_language: &str) -> String {
    let mut prompt = String::from(
        "You are an experienced interior design consultant. Using the homeowner's \
         requirements below, write a summary of the key design points for a \
         professional designer.\n\n",
    );
    let _ = writeln!(prompt, "Project: {}", project.title);
    let _ = writeln!(prompt, "Size: {} ping", project.size);
    let _ = writeln!(prompt, "Style preference: {}", project.style_preference);
    prompt.push_str("Room requirements:\n");
    for room in project.rooms.iter() {
        let _ = writeln!(
            prompt,
            "- {}: {} (priority: {})",
            room.room_type.label(),
            room.description,
            room.priority.as_str()
        );
    }
    let _ = write!(
        prompt,
        "\nCover:\n\
         1. Core design challenges and opportunities\n\
         2. Space planning suggestions\n\
         3. Suggested materials and colour palette\n\n\
         Reply in {reply_language}, in a concise professional tone."
    );
    prompt
}

/// Ask for three interior styles that fit a described lifestyle.
pub fn style_suggestion_prompt(description: &str, reply_language: &str) -> String {
    format!(
        "The homeowner describes their ideal life: \"{}\"\n\
         Suggest 3 interior design styles that suit this description and explain why.\n\
         Reply in {reply_language}.",
        description.trim()
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use roombrief_core::project::NewProject;
    use roombrief_core::room::{Priority, Room, RoomType};
    use roombrief_core::types::ProjectId;

    use super::*;

    fn project() -> Project {
        let mut fields = NewProject {
            title: "Riverside Flat".into(),
            size: 32.0,
            style_preference: "Japandi".into(),
            ..Default::default()
        };
        let mut kitchen = Room::new();
        kitchen.room_type = RoomType::Kitchen;
        kitchen.description = "Open kitchen with island".into();
        kitchen.priority = Priority::High;
        fields.rooms.push(kitchen);
        fields.rooms.push(Room::new());
        Project::from_fields(ProjectId::new("p"), Utc::now(), fields)
    }

    #[test]
    fn summary_prompt_lists_project_and_rooms() {
        let prompt = project_summary_prompt(&project(), "English");
        assert!(prompt.contains("Project: Riverside Flat"));
        assert!(prompt.contains("Size: 32 ping"));
        assert!(prompt.contains("Style preference: Japandi"));
        assert!(prompt.contains("- Kitchen: Open kitchen with island (priority: High)"));
        assert!(prompt.contains("- Living Room:  (priority: Medium)"));
        assert!(prompt.ends_with("Reply in English, in a concise professional tone."));
    }

    #[test]
    fn style_prompt_embeds_description() {
        let prompt = style_suggestion_prompt("  quiet mornings with plants ", "Traditional Chinese");
        assert!(prompt.contains("\"quiet mornings with plants\""));
        assert!(prompt.contains("3 interior design styles"));
        assert!(prompt.ends_with("Reply in Traditional Chinese."));
    }
}
